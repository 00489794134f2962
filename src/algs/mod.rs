//! Re-export public algorithms.

pub mod aggregate;
pub mod difference;
pub mod integrate;
pub mod remap;

pub use aggregate::{Aggregation, nodal_average, topological_aggregate};
pub use difference::{GradientOptions, difference, gradient};
pub use integrate::integrate;
pub use remap::{RemapOptions, nearest_neighbor};
