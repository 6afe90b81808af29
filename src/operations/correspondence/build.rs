use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::error::{CorrespondenceError, Result};
use crate::math::{PositionKey, Precision};
use crate::mesh::{MeshId, MeshStore, VertexSet};

use super::SpatialKeyIndex;

/// A validated position correspondence between two vertex sets.
///
/// Both sides hold exactly the same key set; bucket sizes may differ, which
/// is how a welded mesh relates to an unwelded copy of itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correspondence {
    source: SpatialKeyIndex,
    target: SpatialKeyIndex,
}

impl Correspondence {
    /// Relates `source` and `target` by quantized position.
    ///
    /// # Errors
    ///
    /// Returns [`CorrespondenceError::ShapeMismatch`] if the key sets differ.
    pub fn between(
        source: &VertexSet,
        target: &VertexSet,
        precision: Precision,
    ) -> std::result::Result<Self, CorrespondenceError> {
        let source = SpatialKeyIndex::build(source, precision);
        let target = SpatialKeyIndex::build(target, precision);

        let union_keys = source
            .keys()
            .chain(target.keys())
            .collect::<BTreeSet<_>>()
            .len();
        let source_keys = source.key_count();
        let target_keys = target.key_count();

        debug!(
            source_keys,
            target_keys,
            union_keys,
            precision = precision.digits(),
            "mapped meshes"
        );

        if source_keys == union_keys && target_keys == union_keys {
            Ok(Self { source, target })
        } else {
            warn!(source_keys, target_keys, union_keys, "meshes do not overlap by position");
            Err(CorrespondenceError::ShapeMismatch {
                source_keys,
                target_keys,
                union_keys,
                precision: precision.digits(),
            })
        }
    }

    /// Index of the source side.
    #[must_use]
    pub fn source(&self) -> &SpatialKeyIndex {
        &self.source
    }

    /// Index of the target side.
    #[must_use]
    pub fn target(&self) -> &SpatialKeyIndex {
        &self.target
    }

    /// Precision both sides were keyed at.
    #[must_use]
    pub fn precision(&self) -> Precision {
        self.source.precision()
    }

    /// Number of shared keys.
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.source.key_count()
    }

    /// Iterates `(key, source indices, target indices)` in key order.
    pub fn pairs(&self) -> impl Iterator<Item = (&PositionKey, &[usize], &[usize])> {
        // Both sides hold the same keys, so their ordered iterations line up.
        self.source
            .iter()
            .zip(self.target.iter())
            .map(|((key, source), (_, target))| (key, source, target))
    }
}

/// Builds the position correspondence between two meshes in a store.
///
/// The result is never cached: call this again after either mesh moves.
pub struct BuildCorrespondence {
    source: MeshId,
    target: MeshId,
    precision: Precision,
}

impl BuildCorrespondence {
    /// Creates a new `BuildCorrespondence` operation.
    #[must_use]
    pub fn new(source: MeshId, target: MeshId, precision: Precision) -> Self {
        Self {
            source,
            target,
            precision,
        }
    }

    /// Executes the operation on the base positions of both meshes.
    ///
    /// # Errors
    ///
    /// Returns an error if either mesh is missing or their key sets differ.
    pub fn execute(&self, store: &MeshStore) -> Result<Correspondence> {
        let source = &store.mesh(self.source)?.vertices;
        let target = &store.mesh(self.target)?.vertices;
        Ok(Correspondence::between(source, target, self.precision)?)
    }
}
