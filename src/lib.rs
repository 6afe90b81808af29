pub mod config;
pub mod error;
pub mod math;
pub mod mesh;
pub mod operations;
pub mod roles;

pub use config::TransferConfig;
pub use error::{Result, UnimeshError};
