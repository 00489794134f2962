//! Spherical/Cartesian coordinate helpers.
//!
//! Longitudes and latitudes are in degrees; Cartesian coordinates live on the
//! unit sphere.

/// Convert `(lon, lat)` in degrees to a point on the unit sphere.
#[inline]
pub fn lonlat_to_xyz(lon: f64, lat: f64) -> [f64; 3] {
    let (lon, lat) = (lon.to_radians(), lat.to_radians());
    [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
}

/// Convert a Cartesian point to `(lon, lat)` in degrees.
///
/// The point does not need to be normalized. Longitude is reported in
/// `[-180, 180]`.
#[inline]
pub fn xyz_to_lonlat(p: [f64; 3]) -> (f64, f64) {
    let [x, y, z] = p;
    let lon = y.atan2(x).to_degrees();
    let lat = z.atan2((x * x + y * y).sqrt()).to_degrees();
    (lon, lat)
}

/// Map a longitude into `[-180, 180)`.
#[inline]
pub fn normalize_longitude(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

/// Scale `p` to unit length. The zero vector is returned unchanged.
#[inline]
pub fn normalize(p: [f64; 3]) -> [f64; 3] {
    let n = norm(p);
    if n == 0.0 {
        p
    } else {
        [p[0] / n, p[1] / n, p[2] / n]
    }
}

#[inline]
pub(crate) fn norm(p: [f64; 3]) -> f64 {
    dot(p, p).sqrt()
}

#[inline]
pub(crate) fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
pub(crate) fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Great-circle angle (radians) between two points on the unit sphere.
///
/// Uses `atan2(|a x b|, a . b)`, which stays accurate for nearly identical
/// and nearly antipodal points.
#[inline]
pub fn great_circle_angle(a: [f64; 3], b: [f64; 3]) -> f64 {
    norm(cross(a, b)).atan2(dot(a, b))
}

/// Haversine angle (radians) between two `(lon, lat)` pairs given in radians.
#[inline]
pub fn haversine(lon_a: f64, lat_a: f64, lon_b: f64, lat_b: f64) -> f64 {
    let sin_dlat = ((lat_b - lat_a) * 0.5).sin();
    let sin_dlon = ((lon_b - lon_a) * 0.5).sin();
    let h = sin_dlat * sin_dlat + lat_a.cos() * lat_b.cos() * sin_dlon * sin_dlon;
    2.0 * h.sqrt().min(1.0).asin()
}
