#![cfg_attr(docsrs, feature(doc_cfg))]
//! # ugrid-geo
//!
//! ugrid-geo turns unstructured geospatial meshes (nodes, edges and faces
//! connected through index tables rather than a regular grid) into planar
//! polygon geometry, and moves data between meshes of different topology.
//!
//! ## Features
//! - Closed polygon shells for every face, padded to a uniform length
//! - Detection and GeoJSON-style splitting of faces crossing the ±180° seam,
//!   with a part-to-face index map as the join key for face data
//! - Geometry table and flat polygon collection exports
//! - Nearest-neighbor remapping over ball trees in spherical (haversine) or
//!   Cartesian (Euclidean) coordinates
//! - Topological aggregation, edge differences, gradients and area-weighted
//!   integration of mesh-bound data
//!
//! ## Threading
//!
//! A [`Mesh`](topology::mesh::Mesh) memoizes derived products in unguarded
//! single-threaded cells and is neither `Send` nor `Sync`. Built
//! [`BallTree`](spatial::ball_tree::BallTree)s are plain immutable data.
//!
//! ## Determinism
//!
//! Nearest-neighbor ties resolve to the smaller source index, so results do
//! not depend on the layout of the spatial index.
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade and never installs a logger.

pub mod algs;
pub mod data;
pub mod geometry;
pub mod mesh_error;
pub mod spatial;
pub mod topology;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::aggregate::Aggregation;
    pub use crate::algs::difference::GradientOptions;
    pub use crate::algs::remap::RemapOptions;
    pub use crate::data::field::DataField;
    pub use crate::data::mesh_field::{MeshField, SubsetField};
    pub use crate::geometry::corrected::CorrectedPolygons;
    pub use crate::geometry::export::{
        CollectionOptions, GeometryFrame, GeometryTable, PeriodicElements, PlateCarree,
        PolygonCollection, Projection, ShadedCollection, TableOptions,
    };
    pub use crate::geometry::shells::PolygonShells;
    pub use crate::mesh_error::MeshError;
    pub use crate::spatial::ball_tree::{BallTree, BallTreeOptions};
    pub use crate::spatial::metric::{DistanceMetric, Euclidean, Haversine};
    pub use crate::topology::cache::InvalidateCache;
    pub use crate::topology::connectivity::{Connectivity, FILL_VALUE};
    pub use crate::topology::element::{CoordSystem, ElementKind};
    pub use crate::topology::mesh::Mesh;
    pub use crate::topology::subset::SubsetIndices;
}
