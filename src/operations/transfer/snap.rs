use tracing::debug;

use crate::error::{OperationError, Result};
use crate::math::Point3;
use crate::mesh::{MeshId, MeshStore};

/// Moves every vertex of a target mesh onto its nearest base vertex.
///
/// Used when two meshes are close but do not quantize to the same keys.
/// The search is a brute-force scan; on an exact distance tie the lowest
/// base index wins.
pub struct SnapToNearest {
    base: MeshId,
    target: MeshId,
}

impl SnapToNearest {
    /// Creates a new `SnapToNearest` operation.
    #[must_use]
    pub fn new(base: MeshId, target: MeshId) -> Self {
        Self { base, target }
    }

    /// Executes the snap, returning the number of target vertices that moved.
    ///
    /// # Errors
    ///
    /// Returns an error if either mesh is missing or the base mesh has no
    /// vertices.
    pub fn execute(&self, store: &mut MeshStore) -> Result<usize> {
        let base = store.mesh(self.base)?.vertices.clone();
        if base.is_empty() {
            return Err(OperationError::EmptyBaseSet.into());
        }

        let target = &mut store.mesh_mut(self.target)?.vertices;
        let mut moved = 0;
        for point in target.positions_mut() {
            if let Some(nearest) = nearest_index(base.positions(), point) {
                let snapped = base.positions()[nearest];
                if snapped != *point {
                    *point = snapped;
                    moved += 1;
                }
            }
        }

        debug!(base = base.len(), moved, "snapped vertices to nearest base");
        Ok(moved)
    }
}

/// Index of the candidate closest to `query`, lowest index on ties.
#[must_use]
pub fn nearest_index(candidates: &[Point3], query: &Point3) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, candidate) in candidates.iter().enumerate() {
        let d2 = (candidate - query).norm_squared();
        if best.is_none_or(|(_, best_d2)| d2 < best_d2) {
            best = Some((index, d2));
        }
    }
    best.map(|(index, _)| index)
}
