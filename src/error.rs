use thiserror::Error;

use crate::roles::{Relation, Role};

/// Top-level error type for the unimesh crate.
#[derive(Debug, Error)]
pub enum UnimeshError {
    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    Correspondence(#[from] CorrespondenceError),

    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors related to the mesh store and vertex addressing.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("vertex index {index} is out of range for {len} vertices")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Errors raised while relating two vertex sets by position.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CorrespondenceError {
    /// The quantized position key sets of the two meshes differ.
    ///
    /// All three counts are equal exactly when the key sets agree.
    #[error(
        "target mesh does not exactly overlap base mesh; key counts \
         (source={source_keys} target={target_keys} union={union_keys}); precision={precision}"
    )]
    ShapeMismatch {
        source_keys: usize,
        target_keys: usize,
        union_keys: usize,
        precision: u8,
    },
}

/// Errors raised when two meshes do not share the same structure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StructureError {
    #[error("vertex counts differ: {left} vs {right}")]
    VertexCountMismatch { left: usize, right: usize },

    #[error("vertex group names differ: {left:?} vs {right:?}")]
    GroupSetMismatch {
        left: Vec<String>,
        right: Vec<String>,
    },

    #[error("vertex group {group:?} has different members")]
    GroupMembershipMismatch { group: String },
}

/// Errors related to role-gated operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OperationError {
    #[error("{operation} requires {relation} to hold")]
    PreconditionNotMet {
        operation: &'static str,
        relation: Relation,
    },

    #[error("nearest-neighbor search needs at least one base vertex")]
    EmptyBaseSet,

    #[error("no mesh is bound to the {0} role")]
    RoleUnbound(Role),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Errors related to configuration values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("precision {digits} is out of range [{min}, {max}]")]
    PrecisionOutOfRange { digits: u8, min: u8, max: u8 },
}

/// Convenience type alias for results using [`UnimeshError`].
pub type Result<T> = std::result::Result<T, UnimeshError>;
