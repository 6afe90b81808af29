pub mod groups;
pub mod shape_key;
pub mod vertex_set;

pub use groups::VertexGroups;
pub use shape_key::{ShapeKey, ShapeKeys};
pub use vertex_set::VertexSet;

use crate::error::MeshError;
use crate::math::Point3;
use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Unique identifier for a mesh in the mesh store.
    pub struct MeshId;
}

/// Data associated with a mesh: its shape and its structure.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// Display name of the mesh.
    pub name: String,
    /// Base vertex positions.
    pub vertices: VertexSet,
    /// Named vertex groups.
    pub groups: VertexGroups,
    /// Alternative position sets.
    pub shape_keys: ShapeKeys,
}

impl MeshData {
    /// Creates an ungrouped mesh from positions.
    #[must_use]
    pub fn new(name: impl Into<String>, positions: Vec<Point3>) -> Self {
        Self {
            name: name.into(),
            vertices: VertexSet::new(positions),
            groups: VertexGroups::new(),
            shape_keys: ShapeKeys::new(),
        }
    }

    /// Adds (or replaces) a vertex group.
    #[must_use]
    pub fn with_group(mut self, name: impl Into<String>, members: Vec<usize>) -> Self {
        self.groups.insert(name, members);
        self
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }
}

/// Central arena that owns all meshes the core operates on.
///
/// Meshes are referenced by typed IDs (generational indices), so a role
/// binding can never alias a removed mesh.
#[derive(Debug, Default)]
pub struct MeshStore {
    meshes: SlotMap<MeshId, MeshData>,
}

impl MeshStore {
    /// Creates a new, empty mesh store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a mesh and returns its ID.
    pub fn add_mesh(&mut self, data: MeshData) -> MeshId {
        self.meshes.insert(data)
    }

    /// Removes a mesh, returning its data if it existed.
    pub fn remove_mesh(&mut self, id: MeshId) -> Option<MeshData> {
        self.meshes.remove(id)
    }

    /// Returns `true` if the store holds `id`.
    #[must_use]
    pub fn contains(&self, id: MeshId) -> bool {
        self.meshes.contains_key(id)
    }

    /// Returns a reference to the mesh data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the mesh is not found in the store.
    pub fn mesh(&self, id: MeshId) -> Result<&MeshData, MeshError> {
        self.meshes
            .get(id)
            .ok_or_else(|| MeshError::EntityNotFound("mesh".into()))
    }

    /// Returns a mutable reference to the mesh data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the mesh is not found in the store.
    pub fn mesh_mut(&mut self, id: MeshId) -> Result<&mut MeshData, MeshError> {
        self.meshes
            .get_mut(id)
            .ok_or_else(|| MeshError::EntityNotFound("mesh".into()))
    }

    /// Copies a mesh (positions, groups and shape keys) under a new ID.
    ///
    /// The copy is named after the source with a `.001` suffix.
    ///
    /// # Errors
    ///
    /// Returns an error if the source mesh is not found.
    pub fn duplicate(&mut self, id: MeshId) -> Result<MeshId, MeshError> {
        let mut copy = self.mesh(id)?.clone();
        copy.name.push_str(".001");
        Ok(self.add_mesh(copy))
    }
}
