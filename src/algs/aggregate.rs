//! Topological aggregation: reduce the values of one element kind over the
//! elements incident to each element of another kind.

use crate::data::field::DataField;
use crate::mesh_error::MeshError;
use crate::topology::connectivity::Connectivity;
use crate::topology::element::ElementKind;
use crate::topology::mesh::Mesh;
use num_traits::Float;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Reduction applied over incident values.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    Mean,
    Min,
    Max,
    Median,
    /// Population standard deviation.
    Std,
    /// Population variance.
    Var,
    Sum,
    Prod,
    /// 1 when every value is non-zero.
    All,
    /// 1 when any value is non-zero.
    Any,
}

impl Aggregation {
    pub const ALL: [Aggregation; 10] = [
        Aggregation::Mean,
        Aggregation::Min,
        Aggregation::Max,
        Aggregation::Median,
        Aggregation::Std,
        Aggregation::Var,
        Aggregation::Sum,
        Aggregation::Prod,
        Aggregation::All,
        Aggregation::Any,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Aggregation::Mean => "mean",
            Aggregation::Min => "min",
            Aggregation::Max => "max",
            Aggregation::Median => "median",
            Aggregation::Std => "std",
            Aggregation::Var => "var",
            Aggregation::Sum => "sum",
            Aggregation::Prod => "prod",
            Aggregation::All => "all",
            Aggregation::Any => "any",
        }
    }

    /// Reduce `values`; an empty input yields the reduction's identity, or
    /// NaN where there is none.
    pub fn reduce<T: Float>(self, values: &mut [T]) -> T {
        let n = values.len();
        match self {
            Aggregation::Sum => values.iter().fold(T::zero(), |acc, &v| acc + v),
            Aggregation::Prod => values.iter().fold(T::one(), |acc, &v| acc * v),
            Aggregation::All => bool_value(values.iter().all(|v| !v.is_zero())),
            Aggregation::Any => bool_value(values.iter().any(|v| !v.is_zero())),
            _ if n == 0 => T::nan(),
            Aggregation::Mean => mean(values),
            Aggregation::Min => values.iter().copied().fold(T::infinity(), T::min),
            Aggregation::Max => values.iter().copied().fold(T::neg_infinity(), T::max),
            Aggregation::Median => {
                values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
                if n % 2 == 1 {
                    values[n / 2]
                } else {
                    (values[n / 2 - 1] + values[n / 2]) / (T::one() + T::one())
                }
            }
            Aggregation::Var => variance(values),
            Aggregation::Std => variance(values).sqrt(),
        }
    }
}

fn bool_value<T: Float>(b: bool) -> T {
    if b { T::one() } else { T::zero() }
}

fn mean<T: Float>(values: &[T]) -> T {
    let sum = values.iter().fold(T::zero(), |acc, &v| acc + v);
    sum / T::from(values.len()).unwrap_or_else(T::nan)
}

fn variance<T: Float>(values: &[T]) -> T {
    let m = mean(values);
    let sq = values.iter().fold(T::zero(), |acc, &v| acc + (v - m) * (v - m));
    sq / T::from(values.len()).unwrap_or_else(T::nan)
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Aggregation {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Aggregation::ALL
            .into_iter()
            .find(|a| a.as_str() == wanted)
            .ok_or_else(|| MeshError::InvalidArgument {
                argument: "aggregation",
                value: s.to_string(),
                expected: "mean, min, max, median, std, var, sum, prod, all or any",
            })
    }
}

type Incidence = fn(&Mesh) -> &Connectivity;

/// `(source, destination)` pairs with the table whose row `d` lists the
/// source elements incident to destination element `d`.
const INCIDENCE: [(ElementKind, ElementKind, Incidence); 6] = [
    (ElementKind::Node, ElementKind::Edge, Mesh::edge_node_connectivity),
    (ElementKind::Node, ElementKind::Face, Mesh::face_node_connectivity),
    (ElementKind::Edge, ElementKind::Node, Mesh::node_edge_connectivity),
    (ElementKind::Edge, ElementKind::Face, Mesh::face_edge_connectivity),
    (ElementKind::Face, ElementKind::Node, Mesh::node_face_connectivity),
    (ElementKind::Face, ElementKind::Edge, Mesh::edge_face_connectivity),
];

/// Incidence table for aggregating `from` data onto `to` elements.
pub fn incidence(
    mesh: &Mesh,
    from: ElementKind,
    to: ElementKind,
) -> Result<&Connectivity, MeshError> {
    INCIDENCE
        .iter()
        .find(|(s, d, _)| *s == from && *d == to)
        .map(|(_, _, table)| table(mesh))
        .ok_or(MeshError::UnsupportedCombination {
            operation: "topological aggregation",
            from,
            to,
        })
}

/// Aggregate `data` onto the `destination` elements of `mesh`.
pub fn topological_aggregate<T: Float>(
    mesh: &Mesh,
    data: &DataField<T>,
    destination: ElementKind,
    aggregation: Aggregation,
) -> Result<DataField<T>, MeshError> {
    let source = data
        .centering(mesh)
        .ok_or_else(|| MeshError::UnanchoredData {
            shape: data.shape().to_vec(),
            n_node: mesh.n_node(),
            n_edge: mesh.n_edge(),
            n_face: mesh.n_face(),
        })?;
    let table = incidence(mesh, source, destination)?;

    let mut out = Vec::with_capacity(data.n_rows() * table.n_rows());
    let mut scratch = Vec::with_capacity(table.n_cols());
    for row in data.rows() {
        for d in 0..table.n_rows() {
            scratch.clear();
            scratch.extend(table.real_row(d).iter().map(|&s| row[s]));
            out.push(aggregation.reduce(&mut scratch));
        }
    }
    data.with_trailing(destination.dim_name(), table.n_rows(), out)
}

/// Mean of node values over the nodes of each face.
pub fn nodal_average<T: Float>(
    mesh: &Mesh,
    data: &DataField<T>,
) -> Result<DataField<T>, MeshError> {
    if !data.is_centered_on(mesh, ElementKind::Node) {
        return Err(match data.centering(mesh) {
            Some(kind) => MeshError::UnsupportedCentering {
                operation: "nodal average",
                centering: kind,
            },
            None => MeshError::SizeMatchesNoKind {
                size: data.trailing_len(),
                expected_kind: ElementKind::Node,
                expected: mesh.n_node(),
            },
        });
    }
    let node_data = DataField::new(
        data.dims()[..data.ndim() - 1]
            .iter()
            .cloned()
            .chain(std::iter::once(ElementKind::Node.dim_name().to_string()))
            .collect(),
        data.shape().to_vec(),
        data.values().to_vec(),
    )?
    .renamed(data.name().map(str::to_string));
    topological_aggregate(mesh, &node_data, ElementKind::Face, Aggregation::Mean)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn reductions() {
        let v = [1.0, 4.0, 2.0, 3.0];
        let r = |a: Aggregation| a.reduce(&mut v.to_vec());
        assert_eq!(r(Aggregation::Mean), 2.5);
        assert_eq!(r(Aggregation::Min), 1.0);
        assert_eq!(r(Aggregation::Max), 4.0);
        assert_eq!(r(Aggregation::Median), 2.5);
        assert_abs_diff_eq!(r(Aggregation::Var), 1.25);
        assert_abs_diff_eq!(r(Aggregation::Std), 1.25f64.sqrt());
        assert_eq!(r(Aggregation::Sum), 10.0);
        assert_eq!(r(Aggregation::Prod), 24.0);
        assert_eq!(r(Aggregation::All), 1.0);
        assert_eq!(Aggregation::All.reduce(&mut [1.0, 0.0]), 0.0);
        assert_eq!(Aggregation::Any.reduce(&mut [0.0, 0.0, 2.0]), 1.0);
    }

    #[test]
    fn empty_inputs() {
        let empty: &mut [f64] = &mut [];
        assert!(Aggregation::Mean.reduce(empty).is_nan());
        assert!(Aggregation::Median.reduce(empty).is_nan());
        assert_eq!(Aggregation::Sum.reduce(empty), 0.0);
        assert_eq!(Aggregation::Prod.reduce(empty), 1.0);
        assert_eq!(Aggregation::All.reduce(empty), 1.0);
        assert_eq!(Aggregation::Any.reduce(empty), 0.0);
    }

    #[test]
    fn parsing() {
        assert_eq!("MEDIAN".parse::<Aggregation>().unwrap(), Aggregation::Median);
        assert!(matches!(
            "mode".parse::<Aggregation>(),
            Err(MeshError::InvalidArgument { argument: "aggregation", .. })
        ));
    }
}
