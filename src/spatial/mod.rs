//! Spatial indexing for nearest-neighbor queries.

pub mod ball_tree;
pub mod metric;

pub use ball_tree::{BallTree, BallTreeOptions};
pub use metric::{DistanceMetric, Euclidean, Haversine};
