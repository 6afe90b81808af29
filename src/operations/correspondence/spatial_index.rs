use std::collections::BTreeMap;

use crate::math::{PositionKey, Precision};
use crate::mesh::VertexSet;

/// Vertex indices grouped by quantized position.
///
/// Within each bucket, indices keep the mesh's original order. Coincident
/// duplicates (as in an unwelded mesh) share one bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpatialKeyIndex {
    precision: Precision,
    buckets: BTreeMap<PositionKey, Vec<usize>>,
}

impl SpatialKeyIndex {
    /// Buckets every vertex of `vertices` by its key at `precision`.
    #[must_use]
    pub fn build(vertices: &VertexSet, precision: Precision) -> Self {
        let mut buckets: BTreeMap<PositionKey, Vec<usize>> = BTreeMap::new();
        for (index, point) in vertices.positions().iter().enumerate() {
            buckets
                .entry(PositionKey::from_point(point, precision))
                .or_default()
                .push(index);
        }
        Self { precision, buckets }
    }

    /// Precision the keys were built at.
    #[must_use]
    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.buckets.len()
    }

    /// Returns `true` if no vertex was indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Indices whose position quantizes to `key`.
    #[must_use]
    pub fn indices(&self, key: &PositionKey) -> Option<&[usize]> {
        self.buckets.get(key).map(Vec::as_slice)
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &PositionKey> {
        self.buckets.keys()
    }

    /// `(key, indices)` pairs in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&PositionKey, &[usize])> {
        self.buckets.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Largest vertex index referenced, if any.
    #[must_use]
    pub fn max_index(&self) -> Option<usize> {
        self.buckets.values().flatten().copied().max()
    }
}
