mod build;
mod spatial_index;

pub use build::{BuildCorrespondence, Correspondence};
pub use spatial_index::SpatialKeyIndex;
