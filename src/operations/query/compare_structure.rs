use crate::error::{Result, StructureError};
use crate::mesh::{MeshData, MeshId, MeshStore};

/// Checks that two meshes share the same structure, ignoring positions.
///
/// The checks run cheapest first and stop at the first difference:
/// vertex count, then group names, then the ordered members of each group.
pub struct CompareStructure {
    left: MeshId,
    right: MeshId,
}

impl CompareStructure {
    /// Creates a new `CompareStructure` query.
    #[must_use]
    pub fn new(left: MeshId, right: MeshId) -> Self {
        Self { left, right }
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns an error if either mesh is missing, or the first structural
    /// difference found.
    pub fn execute(&self, store: &MeshStore) -> Result<()> {
        let left = store.mesh(self.left)?;
        let right = store.mesh(self.right)?;
        Ok(compare_structure(left, right)?)
    }
}

/// Compares the structure of two meshes directly.
///
/// # Errors
///
/// Returns the first structural difference found.
pub fn compare_structure(
    left: &MeshData,
    right: &MeshData,
) -> std::result::Result<(), StructureError> {
    if left.vertex_count() != right.vertex_count() {
        return Err(StructureError::VertexCountMismatch {
            left: left.vertex_count(),
            right: right.vertex_count(),
        });
    }

    if !left.groups.names().eq(right.groups.names()) {
        return Err(StructureError::GroupSetMismatch {
            left: left.groups.names().map(str::to_owned).collect(),
            right: right.groups.names().map(str::to_owned).collect(),
        });
    }

    // Name sets are equal, so both iterate the same names in the same order.
    for ((name, a), (_, b)) in left.groups.iter().zip(right.groups.iter()) {
        if a != b {
            return Err(StructureError::GroupMembershipMismatch {
                group: name.to_owned(),
            });
        }
    }

    Ok(())
}
