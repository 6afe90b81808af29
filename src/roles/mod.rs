//! Role bindings and the compatibility flags that gate transfers.
//!
//! Four roles take part in a transfer:
//!
//! - **Original**: the welded reference mesh.
//! - **Zero**: an unwelded export of Original in the same shape.
//! - **Morphed**: the unwelded export after an edit; same structure as Zero.
//! - **UniMesh**: the welded mesh that receives the edit; same structure as Original.
//!
//! Original and Zero are related by position; that map carries an edit from
//! Morphed to UniMesh ([`RoleGraph::write_unimesh`]) and back
//! ([`RoleGraph::cast_mesh`]).

mod graph;
mod relation;
mod role;

pub use graph::{RoleGraph, TransferReport};
pub use relation::{Relation, RelationFlags};
pub use role::{Role, RoleTable};
