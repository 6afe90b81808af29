use std::fmt;

use crate::mesh::MeshId;

/// The part a mesh plays in a shape transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// The welded reference mesh.
    Original,
    /// The unwelded export of the reference mesh in its rest shape.
    Zero,
    /// The unwelded export carrying the edited shape; shares Zero's structure.
    Morphed,
    /// The welded mesh receiving the edit; shares Original's structure.
    UniMesh,
}

impl Role {
    /// Every role, in table order.
    pub const ALL: [Role; 4] = [Role::Original, Role::Zero, Role::Morphed, Role::UniMesh];

    fn slot(self) -> usize {
        match self {
            Role::Original => 0,
            Role::Zero => 1,
            Role::Morphed => 2,
            Role::UniMesh => 3,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Original => "original",
            Role::Zero => "zero",
            Role::Morphed => "morphed",
            Role::UniMesh => "unimesh",
        })
    }
}

/// Fixed table of role bindings, one optional mesh per role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoleTable {
    slots: [Option<MeshId>; 4],
}

impl RoleTable {
    /// Creates a table with every role unbound.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mesh bound to `role`, if any.
    #[must_use]
    pub fn get(&self, role: Role) -> Option<MeshId> {
        self.slots[role.slot()]
    }

    /// Binds or unbinds `role`, returning the previous binding.
    pub fn set(&mut self, role: Role, mesh: Option<MeshId>) -> Option<MeshId> {
        std::mem::replace(&mut self.slots[role.slot()], mesh)
    }
}
