mod compare_structure;

pub use compare_structure::{compare_structure, CompareStructure};
