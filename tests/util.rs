#![allow(dead_code)]
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use ugrid_geo::prelude::*;

/// Regular lon/lat grid of `nx * ny` quads over the given box (degrees).
pub fn lonlat_grid(nx: usize, ny: usize, lon: (f64, f64), lat: (f64, f64)) -> Mesh {
    let mut node_lon = Vec::new();
    let mut node_lat = Vec::new();
    for j in 0..=ny {
        for i in 0..=nx {
            node_lon.push(lon.0 + (lon.1 - lon.0) * i as f64 / nx as f64);
            node_lat.push(lat.0 + (lat.1 - lat.0) * j as f64 / ny as f64);
        }
    }
    let id = |i: usize, j: usize| j * (nx + 1) + i;
    let faces: Vec<Vec<usize>> = (0..ny)
        .flat_map(|j| {
            (0..nx).map(move |i| vec![id(i, j), id(i + 1, j), id(i + 1, j + 1), id(i, j + 1)])
        })
        .collect();
    Mesh::from_faces(node_lon, node_lat, &faces).unwrap()
}

/// A latitude band wrapping the whole globe with `nx` quads; the last quad
/// closes over the antimeridian.
pub fn global_band(nx: usize, lat: (f64, f64)) -> Mesh {
    let step = 360.0 / nx as f64;
    let mut node_lon = Vec::new();
    let mut node_lat = Vec::new();
    for &y in &[lat.0, lat.1] {
        for i in 0..nx {
            node_lon.push(-180.0 + step * (i as f64 + 0.5));
            node_lat.push(y);
        }
    }
    let faces: Vec<Vec<usize>> = (0..nx)
        .map(|i| {
            let n = (i + 1) % nx;
            vec![i, n, nx + n, nx + i]
        })
        .collect();
    Mesh::from_faces(node_lon, node_lat, &faces).unwrap()
}

/// One quad at the prime meridian, one straddling the antimeridian, one
/// triangle at 100°E.
pub fn seam_mesh() -> Mesh {
    Mesh::from_faces(
        vec![0.0, 10.0, 10.0, 0.0, 170.0, -170.0, -170.0, 170.0, 100.0, 110.0, 105.0],
        vec![0.0, 0.0, 10.0, 10.0, -10.0, -10.0, 10.0, 10.0, 0.0, 0.0, 10.0],
        &[vec![0, 1, 2, 3], vec![4, 5, 6, 7], vec![8, 9, 10]],
    )
    .unwrap()
}

/// Seeded uniform points on the sphere, as (lon, lat) degrees, away from
/// the poles.
pub fn random_lonlat(n: usize, seed: u64) -> (Vec<f64>, Vec<f64>) {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..n)
        .map(|_| (rng.gen_range(-180.0..180.0), rng.gen_range(-80.0..80.0)))
        .unzip()
}

/// Face-centered field counting up from `start`.
pub fn face_ramp(mesh: &Mesh, start: f64) -> DataField<f64> {
    DataField::from_vec("n_face", (0..mesh.n_face()).map(|f| start + f as f64).collect())
}
