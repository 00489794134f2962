//! Data module: shaped fields and their mesh binding

pub mod field;
pub mod mesh_field;

pub use field::DataField;
pub use mesh_field::{MeshField, SubsetField};
