//! Element kinds and coordinate systems of an unstructured mesh.
//!
//! Data on a mesh is anchored to one [`ElementKind`]: corner nodes, edge
//! centers, or face centers. Operations that move data between kinds dispatch
//! on `(from, to)` pairs of this enum.

use crate::mesh_error::MeshError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Dimension names used for the trailing (spatial) axis of mesh-bound data.
pub const GRID_DIMS: [&str; 3] = ["n_node", "n_edge", "n_face"];

/// The three element kinds of a 2D unstructured mesh.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// Corner nodes.
    Node,
    /// Edges, located at their centers.
    Edge,
    /// Faces, located at their centers.
    Face,
}

impl ElementKind {
    /// All kinds in canonical (node, edge, face) order.
    pub const ALL: [ElementKind; 3] = [ElementKind::Node, ElementKind::Edge, ElementKind::Face];

    /// Name of the trailing dimension for data anchored to this kind.
    pub fn dim_name(self) -> &'static str {
        match self {
            ElementKind::Node => GRID_DIMS[0],
            ElementKind::Edge => GRID_DIMS[1],
            ElementKind::Face => GRID_DIMS[2],
        }
    }

    /// Inverse of [`ElementKind::dim_name`].
    pub fn from_dim_name(name: &str) -> Option<Self> {
        ElementKind::ALL.into_iter().find(|k| k.dim_name() == name)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ElementKind::Node => "node",
            ElementKind::Edge => "edge",
            ElementKind::Face => "face",
        };
        f.write_str(s)
    }
}

impl FromStr for ElementKind {
    type Err = MeshError;

    /// Accepts the singular (`"face"`), plural (`"faces"`), location
    /// (`"face centers"`) and dimension (`"n_face"`) spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "node" | "nodes" | "corner nodes" | "n_node" => Ok(ElementKind::Node),
            "edge" | "edges" | "edge centers" | "n_edge" => Ok(ElementKind::Edge),
            "face" | "faces" | "face centers" | "n_face" => Ok(ElementKind::Face),
            _ => Err(MeshError::InvalidArgument {
                argument: "element kind",
                value: s.to_string(),
                expected: "'nodes', 'edge centers', or 'face centers'",
            }),
        }
    }
}

/// Coordinate system used for spatial queries.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordSystem {
    /// Longitude/latitude in degrees, compared with great-circle distance.
    #[default]
    Spherical,
    /// Unit-sphere x/y/z, compared with Euclidean distance.
    Cartesian,
}

impl fmt::Display for CoordSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordSystem::Spherical => f.write_str("spherical"),
            CoordSystem::Cartesian => f.write_str("cartesian"),
        }
    }
}

impl FromStr for CoordSystem {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spherical" => Ok(CoordSystem::Spherical),
            "cartesian" => Ok(CoordSystem::Cartesian),
            _ => Err(MeshError::InvalidArgument {
                argument: "coord_type",
                value: s.to_string(),
                expected: "'spherical' or 'cartesian'",
            }),
        }
    }
}
