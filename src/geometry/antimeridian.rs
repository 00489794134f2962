//! Antimeridian detection and seam splitting.
//!
//! A face crosses the antimeridian when two consecutive vertices of its shell
//! differ in longitude by 180 degrees or more. Crossing rings are cut at the
//! ±180° seam and the pieces are re-joined along the seam into rings whose
//! longitudes each stay inside `[-180, 180]`, following the GeoJSON (RFC 7946
//! §3.1.9) splitting convention. Rings that enclose a pole are closed over that
//! pole: eastward traversal closes over the north pole, westward over the
//! south pole.
//!
//! Split parts are emitted in reverse of the order their rings are closed,
//! which puts the eastern part of a simple two-way split first.

use crate::geometry::coordinates::normalize_longitude;
use crate::geometry::shells::PolygonShells;
use geo_types::{LineString, Polygon};
use itertools::Itertools;

/// Longitude jump between consecutive vertices that marks a seam crossing.
pub const CROSSING_THRESHOLD: f64 = 180.0;

/// Whether consecutive vertices of `shell` jump by at least 180° longitude.
pub fn crosses_antimeridian(shell: &[[f64; 2]]) -> bool {
    shell
        .iter()
        .tuple_windows()
        .any(|(a, b)| (b[0] - a[0]).abs() >= CROSSING_THRESHOLD)
}

/// Indices of all shells that cross the antimeridian, ascending.
pub fn antimeridian_face_indices(shells: &PolygonShells) -> Vec<usize> {
    let flagged: Vec<usize> = shells.iter().positions(crosses_antimeridian).collect();
    log::debug!(
        "{} of {} faces cross the antimeridian",
        flagged.len(),
        shells.len()
    );
    flagged
}

/// Splits a closed ring that may cross the antimeridian.
///
/// Implementations return one polygon when no split is needed and several
/// when the ring is cut, each within a single ≤360° longitude window.
pub trait SeamSplitter {
    fn split(&self, ring: &[[f64; 2]]) -> Result<Vec<Polygon<f64>>, String>;
}

/// Seam splitter following the GeoJSON antimeridian-cutting convention, with
/// linear ("flat") interpolation of crossing latitudes.
#[derive(Clone, Copy, Debug, Default)]
pub struct GeoJsonSplitter;

impl SeamSplitter for GeoJsonSplitter {
    fn split(&self, ring: &[[f64; 2]]) -> Result<Vec<Polygon<f64>>, String> {
        let coords = prepare_ring(ring)?;
        let mut segments = segment(&coords);
        if segments.is_empty() {
            return Ok(vec![to_polygon(coords)]);
        }
        extend_over_poles(&mut segments);

        let parts: Vec<Polygon<f64>> = build_rings(segments)
            .into_iter()
            .filter(|ring| {
                let keep = distinct_vertices(ring) >= 3;
                if !keep {
                    log::debug!("dropping degenerate seam sliver {ring:?}");
                }
                keep
            })
            .map(to_polygon)
            .collect();
        if parts.is_empty() {
            return Err("splitting produced no non-degenerate polygon".into());
        }
        Ok(parts)
    }
}

/// Normalize longitudes, drop consecutive duplicates and close the ring.
fn prepare_ring(ring: &[[f64; 2]]) -> Result<Vec<[f64; 2]>, String> {
    if ring.iter().flatten().any(|v| !v.is_finite()) {
        return Err("ring contains non-finite coordinates".into());
    }
    let mut coords: Vec<[f64; 2]> = ring
        .iter()
        .map(|&[lon, lat]| {
            if (-180.0..=180.0).contains(&lon) {
                [lon, lat]
            } else {
                [normalize_longitude(lon), lat]
            }
        })
        .dedup()
        .collect();
    if coords.first() != coords.last() {
        if let Some(&first) = coords.first() {
            coords.push(first);
        }
    }
    if distinct_vertices(&coords) < 3 {
        return Err(format!(
            "ring has {} distinct vertices; at least 3 are required",
            distinct_vertices(&coords)
        ));
    }
    if coords.iter().all(|p| p[0].abs() == 180.0) {
        return Err("every vertex lies on the antimeridian".into());
    }
    Ok(coords)
}

/// Cut a closed ring into open segments that start and end on the seam.
///
/// Returns an empty vector when the ring never crosses.
fn segment(coords: &[[f64; 2]]) -> Vec<Vec<[f64; 2]>> {
    let mut current: Vec<[f64; 2]> = Vec::new();
    let mut segments: Vec<Vec<[f64; 2]>> = Vec::new();
    for (&start, &end) in coords.iter().tuple_windows() {
        current.push(start);
        let delta = end[0] - start[0];
        if delta > 180.0 && delta != 360.0 {
            // Westward across the seam.
            let lat = crossing_latitude(start, end);
            current.push([-180.0, lat]);
            segments.push(std::mem::take(&mut current));
            current.push([180.0, lat]);
        } else if -delta > 180.0 && -delta != 360.0 {
            // Eastward across the seam.
            let lat = crossing_latitude(end, start);
            current.push([180.0, lat]);
            segments.push(std::mem::take(&mut current));
            current.push([-180.0, lat]);
        }
    }
    if segments.is_empty() {
        return segments;
    }
    if coords.last() == segments[0].first() {
        // The trailing run wraps around into the first segment.
        current.append(&mut segments[0]);
        segments[0] = current;
    } else if let Some(&last) = coords.last() {
        current.push(last);
        segments.push(current);
    }
    segments
}

/// Latitude where the straight lon/lat line from `west` (near -180) to
/// `east` (near +180, reached by going west) meets the seam.
fn crossing_latitude(west: [f64; 2], east: [f64; 2]) -> f64 {
    let dlat = east[1] - west[1];
    let lat = if east[0] > 0.0 {
        west[1] + (west[0] + 180.0) * dlat / (west[0] + 360.0 - east[0])
    } else {
        west[1] + (180.0 - west[0]) * dlat / (east[0] + 360.0 - west[0])
    };
    (lat * 1e7).round() / 1e7
}

/// Close rings that wrap around a pole.
///
/// Balanced rings cross eastward and westward equally often. A surplus of
/// eastward crossings means the ring circles the north pole; a surplus of
/// westward crossings, the south pole.
fn extend_over_poles(segments: &mut [Vec<[f64; 2]>]) {
    let end_of = |s: &Vec<[f64; 2]>| s.last().copied().unwrap_or([0.0, 0.0]);
    let right_ends: Vec<usize> = segments.iter().positions(|s| end_of(s)[0] == 180.0).collect();
    let left_ends: Vec<usize> = segments.iter().positions(|s| end_of(s)[0] == -180.0).collect();

    let target = if right_ends.len() > left_ends.len() {
        right_ends
            .iter()
            .copied()
            .max_by(|&a, &b| end_of(&segments[a])[1].total_cmp(&end_of(&segments[b])[1]))
            .map(|i| (i, [[180.0, 90.0], [-180.0, 90.0]]))
    } else if left_ends.len() > right_ends.len() {
        left_ends
            .iter()
            .copied()
            .min_by(|&a, &b| end_of(&segments[a])[1].total_cmp(&end_of(&segments[b])[1]))
            .map(|i| (i, [[-180.0, -90.0], [180.0, -90.0]]))
    } else {
        None
    };

    if let Some((i, cap)) = target {
        segments[i].extend(cap);
    }
}

fn is_self_closing(segment: &[[f64; 2]]) -> bool {
    let (Some(first), Some(last)) = (segment.first(), segment.last()) else {
        return false;
    };
    let is_right = last[0] == 180.0;
    first[0] == last[0]
        && ((is_right && first[1] > last[1]) || (!is_right && first[1] < last[1]))
}

/// Join seam segments into closed rings by walking along the seam to the
/// nearest segment that continues the boundary.
fn build_rings(mut segments: Vec<Vec<[f64; 2]>>) -> Vec<Vec<[f64; 2]>> {
    let mut rings = Vec::new();
    while let Some(mut segment) = segments.pop() {
        loop {
            let (first, end) = match (segment.first(), segment.last()) {
                (Some(&f), Some(&l)) => (f, l),
                _ => break,
            };
            let is_right = end[0] == 180.0;

            let mut candidates: Vec<(Option<usize>, f64)> = Vec::new();
            if is_self_closing(&segment) {
                candidates.push((None, first[1]));
            }
            for (i, s) in segments.iter().enumerate() {
                let (s_first, s_last) = (s[0], s[s.len() - 1]);
                if s_first[0] != end[0] {
                    continue;
                }
                let continues = if is_right {
                    s_first[1] > end[1] && (!is_self_closing(s) || s_last[1] < first[1])
                } else {
                    s_first[1] < end[1] && (!is_self_closing(s) || s_last[1] > first[1])
                };
                if continues {
                    candidates.push((Some(i), s_first[1]));
                }
            }
            // Walking north along the right edge, south along the left edge.
            candidates.sort_by(|a, b| {
                if is_right {
                    a.1.total_cmp(&b.1)
                } else {
                    b.1.total_cmp(&a.1)
                }
            });

            match candidates.first() {
                Some(&(Some(i), _)) => {
                    let next = segments.remove(i);
                    segment.extend(next);
                }
                _ => {
                    rings.push(segment);
                    break;
                }
            }
        }
    }
    rings.reverse();
    rings
}

fn distinct_vertices(ring: &[[f64; 2]]) -> usize {
    let mut pts: Vec<(u64, u64)> = ring
        .iter()
        .map(|p| (p[0].to_bits(), p[1].to_bits()))
        .collect();
    pts.sort_unstable();
    pts.dedup();
    pts.len()
}

fn to_polygon(ring: Vec<[f64; 2]>) -> Polygon<f64> {
    let exterior: LineString<f64> = ring.into_iter().map(|[x, y]| (x, y)).collect();
    Polygon::new(exterior, vec![])
}
