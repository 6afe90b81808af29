use std::collections::BTreeSet;

use tracing::debug;

use crate::error::Result;
use crate::mesh::{MeshId, MeshStore};

/// Copies selected vertex positions index-for-index between two meshes.
///
/// No correspondence is involved: `target[i] = source[i]` for every selected
/// `i`. Both meshes must cover every selected index.
pub struct CopySelected {
    source: MeshId,
    target: MeshId,
    indices: BTreeSet<usize>,
}

impl CopySelected {
    /// Creates a new `CopySelected` operation.
    #[must_use]
    pub fn new(source: MeshId, target: MeshId, indices: BTreeSet<usize>) -> Self {
        Self {
            source,
            target,
            indices,
        }
    }

    /// Executes the copy, returning the number of vertices copied.
    ///
    /// # Errors
    ///
    /// Returns an error if either mesh is missing or a selected index is out
    /// of range for either mesh. Nothing is written in that case.
    pub fn execute(&self, store: &mut MeshStore) -> Result<usize> {
        let source = store.mesh(self.source)?.vertices.clone();
        let target = &mut store.mesh_mut(self.target)?.vertices;

        for &index in &self.indices {
            source.check_index(index)?;
            target.check_index(index)?;
        }
        for &index in &self.indices {
            target.set_position(index, *source.position(index)?)?;
        }

        debug!(copied = self.indices.len(), "copied selected vertices");
        Ok(self.indices.len())
    }
}
