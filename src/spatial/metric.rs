//! Distance metrics for the ball tree.
//!
//! A metric owns the mapping from user coordinates to the internal
//! representation the tree stores, and must satisfy the triangle inequality
//! on that representation: ball-tree pruning relies on it.

use crate::geometry::coordinates::{lonlat_to_xyz, normalize, xyz_to_lonlat};
use serde::{Deserialize, Serialize};

/// A true metric over fixed-dimension points.
pub trait DistanceMetric {
    /// Number of coordinates per point.
    fn dim(&self) -> usize;

    /// Convert user coordinates into the stored representation.
    fn prepare(&self, point: &[f64], out: &mut [f64]) {
        out.copy_from_slice(point);
    }

    /// Distance between two prepared points.
    fn distance(&self, a: &[f64], b: &[f64]) -> f64;

    /// A representative center for a set of prepared points. Any point of the
    /// space is correct; points close to the set make tighter balls.
    fn center<'a>(&self, points: impl Iterator<Item = &'a [f64]>) -> Vec<f64> {
        let mut sum = vec![0.0; self.dim()];
        let mut count = 0usize;
        for p in points {
            for (acc, v) in sum.iter_mut().zip(p) {
                *acc += v;
            }
            count += 1;
        }
        if count > 0 {
            sum.iter_mut().for_each(|v| *v /= count as f64);
        }
        sum
    }
}

/// Great-circle distance on the unit sphere.
///
/// User points are `[lon, lat]` in degrees; they are stored in radians and
/// distances are returned in radians.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Haversine;

impl DistanceMetric for Haversine {
    fn dim(&self) -> usize {
        2
    }

    fn prepare(&self, point: &[f64], out: &mut [f64]) {
        out[0] = point[0].to_radians();
        out[1] = point[1].to_radians();
    }

    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        crate::geometry::coordinates::haversine(a[0], a[1], b[0], b[1])
    }

    /// Spherical mean, so clusters straddling the antimeridian stay tight.
    fn center<'a>(&self, points: impl Iterator<Item = &'a [f64]>) -> Vec<f64> {
        let mut sum = [0.0; 3];
        for p in points {
            let xyz = lonlat_to_xyz(p[0].to_degrees(), p[1].to_degrees());
            for (acc, v) in sum.iter_mut().zip(xyz) {
                *acc += v;
            }
        }
        let (lon, lat) = xyz_to_lonlat(normalize(sum));
        vec![lon.to_radians(), lat.to_radians()]
    }
}

/// Euclidean (Minkowski p = 2) distance over Cartesian `[x, y, z]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Euclidean;

impl DistanceMetric for Euclidean {
    fn dim(&self) -> usize {
        3
    }

    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        a.iter()
            .zip(b)
            .map(|(lhs, rhs)| {
                let diff = lhs - rhs;
                diff * diff
            })
            .sum::<f64>()
            .sqrt()
    }
}
