pub mod correspondence;
pub mod query;
pub mod transfer;
