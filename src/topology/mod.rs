//! Top-level module for mesh topology.
//!
//! This module provides the concrete [`Mesh`] and what it is built from:
//! - element kinds and coordinate systems
//! - fill-padded connectivity tables and their derivation
//! - the memoized cache of derived products and its invalidation trait
//! - index-based subsetting

pub mod cache;
pub mod connectivity;
pub mod element;
pub mod mesh;
pub mod subset;

pub use cache::InvalidateCache;
pub use connectivity::{Connectivity, FILL_VALUE};
pub use element::{CoordSystem, ElementKind};
pub use mesh::Mesh;
pub use subset::SubsetIndices;
