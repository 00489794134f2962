//! MeshError: Unified error type for ugrid-geo public APIs
//!
//! Every fallible operation in the crate reports through this enum. Errors are
//! raised synchronously at the point of detection and nothing is retried: all
//! operations are deterministic transformations over in-memory arrays.

use crate::topology::element::ElementKind;
use thiserror::Error;

/// Unified error type for ugrid-geo operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeshError {
    /// A data field's size matches a different element kind than the one the
    /// operation requires.
    #[error(
        "Data variable with size {size} does not match the number of {expected_kind}s \
         ({expected}); current size matches the number of {matched}s"
    )]
    SizeMatchesOtherKind {
        size: usize,
        expected_kind: ElementKind,
        expected: usize,
        matched: ElementKind,
    },
    /// A data field's size matches no element kind the operation accepts.
    #[error(
        "Data variable with size {size} does not match the number of {expected_kind}s ({expected})"
    )]
    SizeMatchesNoKind {
        size: usize,
        expected_kind: ElementKind,
        expected: usize,
    },
    /// Trailing dimension matches none of the node, edge or face counts.
    #[error(
        "Invalid data shape {shape:?}: the final dimension should match the number of nodes \
         ({n_node}), edges ({n_edge}) or faces ({n_face})"
    )]
    UnanchoredData {
        shape: Vec<usize>,
        n_node: usize,
        n_edge: usize,
        n_face: usize,
    },
    /// Operation requires a 1-D slice of data.
    #[error("Data variable must be 1-dimensional with length {expected}, got shape {shape:?}")]
    NotOneDimensional { shape: Vec<usize>, expected: usize },
    /// Declared shape and value buffer disagree.
    #[error("Invalid shape: {0}")]
    InvalidShape(String),
    /// An enum-like argument received an unrecognized value.
    #[error("Invalid {argument} '{value}': expected one of {expected}")]
    InvalidArgument {
        argument: &'static str,
        value: String,
        expected: &'static str,
    },
    /// The operation has no definition for this (source, destination) pair.
    #[error("{operation} from {from}-centered data onto {to}s is not supported")]
    UnsupportedCombination {
        operation: &'static str,
        from: ElementKind,
        to: ElementKind,
    },
    /// The operation is not defined for data with this centering.
    #[error("{operation} is not supported for {centering}-centered data")]
    UnsupportedCentering {
        operation: &'static str,
        centering: ElementKind,
    },
    /// The antimeridian splitter could not produce valid geometry for a face.
    #[error("Geometry repair failed for face {face}: {reason}")]
    GeometryRepair { face: usize, reason: String },
    /// Mesh arrays violate the connectivity invariants.
    #[error("Topology error: {0}")]
    InvalidTopology(String),
    /// A spatial index was requested over zero points.
    #[error("Cannot build a spatial index over an empty point set")]
    EmptyIndex,
}
