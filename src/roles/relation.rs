use std::fmt;

use super::Role;

/// A pairwise compatibility relation between bound roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// Original and Zero occupy the same quantized positions.
    ShapeEqual,
    /// Zero and Morphed share vertex count and vertex groups.
    StructEqual,
    /// Morphed and UniMesh share positions, and Original and UniMesh share structure.
    ShapeAndStructEqual,
}

impl Relation {
    /// Every relation, in evaluation order.
    pub const ALL: [Relation; 3] = [
        Relation::ShapeEqual,
        Relation::StructEqual,
        Relation::ShapeAndStructEqual,
    ];

    /// Roles whose binding or positions this relation depends on.
    #[must_use]
    pub fn inputs(self) -> &'static [Role] {
        match self {
            Relation::ShapeEqual => &[Role::Original, Role::Zero],
            Relation::StructEqual => &[Role::Zero, Role::Morphed],
            Relation::ShapeAndStructEqual => &[Role::Original, Role::Morphed, Role::UniMesh],
        }
    }

    /// Returns `true` if `role` is an input of this relation.
    #[must_use]
    pub fn depends_on(self, role: Role) -> bool {
        self.inputs().contains(&role)
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Relation::ShapeEqual => "shape_equal(original, zero)",
            Relation::StructEqual => "struct_equal(zero, morphed)",
            Relation::ShapeAndStructEqual => {
                "shape_equal(morphed, unimesh) and struct_equal(original, unimesh)"
            }
        })
    }
}

/// Snapshot of every relation flag.
///
/// Flags are derived from the current role bindings and never stored apart
/// from them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelationFlags {
    pub shape_equal: bool,
    pub struct_equal: bool,
    pub shape_and_struct_equal: bool,
}

impl RelationFlags {
    /// Value of `relation`.
    #[must_use]
    pub fn get(&self, relation: Relation) -> bool {
        match relation {
            Relation::ShapeEqual => self.shape_equal,
            Relation::StructEqual => self.struct_equal,
            Relation::ShapeAndStructEqual => self.shape_and_struct_equal,
        }
    }

    pub(crate) fn set(&mut self, relation: Relation, value: bool) {
        match relation {
            Relation::ShapeEqual => self.shape_equal = value,
            Relation::StructEqual => self.struct_equal = value,
            Relation::ShapeAndStructEqual => self.shape_and_struct_equal = value,
        }
    }
}
