//! Antimeridian-corrected polygon parts and their source-face map.
//!
//! Parts are accumulated in face order in a single pass: a face that does not
//! cross the seam contributes its shell as one part, a crossing face
//! contributes every part the splitter emits, consecutively. The parallel
//! `original_to_corrected` array records the source face of each part and is
//! the join key between corrected geometry and per-face data.

use crate::geometry::antimeridian::{GeoJsonSplitter, SeamSplitter};
use crate::geometry::shells::PolygonShells;
use crate::mesh_error::MeshError;
use geo_types::{Geometry, LineString, MultiPolygon, Polygon};
use itertools::Itertools;

#[derive(Clone, Debug, PartialEq)]
pub struct CorrectedPolygons {
    parts: Vec<Polygon<f64>>,
    original_to_corrected: Vec<usize>,
    /// `face_offsets[f]..face_offsets[f + 1]` are the parts of face `f`.
    face_offsets: Vec<usize>,
}

impl CorrectedPolygons {
    /// Correct every shell with the default GeoJSON splitter.
    ///
    /// `antimeridian_faces` must be ascending.
    pub fn build(shells: &PolygonShells, antimeridian_faces: &[usize]) -> Result<Self, MeshError> {
        Self::build_with(shells, antimeridian_faces, &GeoJsonSplitter)
    }

    /// Correct every shell, splitting flagged faces with `splitter`.
    ///
    /// A splitter failure aborts the whole build.
    pub fn build_with<S: SeamSplitter + ?Sized>(
        shells: &PolygonShells,
        antimeridian_faces: &[usize],
        splitter: &S,
    ) -> Result<Self, MeshError> {
        let n_face = shells.len();
        let mut parts = Vec::with_capacity(n_face + antimeridian_faces.len());
        let mut original_to_corrected = Vec::with_capacity(parts.capacity());
        let mut face_offsets = Vec::with_capacity(n_face + 1);
        face_offsets.push(0);

        let mut flagged = antimeridian_faces.iter().copied().peekable();
        for face in 0..n_face {
            let shell = shells.shell(face);
            if flagged.next_if_eq(&face).is_some() {
                let split = splitter
                    .split(shell)
                    .map_err(|reason| MeshError::GeometryRepair { face, reason })?;
                original_to_corrected.extend(std::iter::repeat_n(face, split.len()));
                parts.extend(split);
            } else {
                parts.push(shell_polygon(shell));
                original_to_corrected.push(face);
            }
            face_offsets.push(parts.len());
        }

        log::debug!(
            "corrected {} faces into {} polygon parts ({} split across the antimeridian)",
            n_face,
            parts.len(),
            antimeridian_faces.len()
        );
        Ok(Self {
            parts,
            original_to_corrected,
            face_offsets,
        })
    }

    /// All corrected parts, in face order.
    pub fn parts(&self) -> &[Polygon<f64>] {
        &self.parts
    }

    /// Source face of every part.
    pub fn original_to_corrected(&self) -> &[usize] {
        &self.original_to_corrected
    }

    /// Number of corrected parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Number of source faces.
    pub fn n_face(&self) -> usize {
        self.face_offsets.len() - 1
    }

    /// Parts derived from `face`.
    pub fn face_parts(&self, face: usize) -> &[Polygon<f64>] {
        &self.parts[self.face_offsets[face]..self.face_offsets[face + 1]]
    }

    /// Geometry of `face`: a polygon, or a multi-polygon when it was split.
    pub fn face_geometry(&self, face: usize) -> Geometry<f64> {
        match self.face_parts(face) {
            [single] => Geometry::Polygon(single.clone()),
            parts => Geometry::MultiPolygon(MultiPolygon::new(parts.to_vec())),
        }
    }
}

/// Shell as a polygon, with padding repeats collapsed.
fn shell_polygon(shell: &[[f64; 2]]) -> Polygon<f64> {
    let exterior: LineString<f64> = shell.iter().dedup().map(|&[x, y]| (x, y)).collect();
    Polygon::new(exterior, vec![])
}
