//! Geometry export: a row-per-polygon geometry table and a flat polygon
//! collection for renderers.
//!
//! Both carry a per-row source-face index so face-centered data can be joined
//! onto the geometry after antimeridian correction has changed the row count.

use crate::geometry::corrected::CorrectedPolygons;
use crate::geometry::shells::PolygonShells;
use crate::mesh_error::MeshError;
use geo_types::Polygon;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

/// How faces crossing the antimeridian appear in a [`PolygonCollection`].
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodicElements {
    /// Keep the original, unsplit shells (one ring per face).
    Include,
    /// Drop crossing faces entirely.
    #[default]
    Exclude,
    /// Use the corrected, split parts.
    Split,
}

impl fmt::Display for PeriodicElements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PeriodicElements::Include => "include",
            PeriodicElements::Exclude => "exclude",
            PeriodicElements::Split => "split",
        })
    }
}

impl FromStr for PeriodicElements {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "include" => Ok(PeriodicElements::Include),
            "exclude" => Ok(PeriodicElements::Exclude),
            "split" => Ok(PeriodicElements::Split),
            _ => Err(MeshError::InvalidArgument {
                argument: "periodic_elements",
                value: s.to_string(),
                expected: "'include', 'exclude', or 'split'",
            }),
        }
    }
}

/// Options for [`Mesh::to_geometry_table`](crate::topology::mesh::Mesh::to_geometry_table).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableOptions {
    /// Rebuild even if a cached table exists.
    pub override_cache: bool,
    /// Store the built table on the mesh.
    pub cache: bool,
    /// Drop faces that cross the antimeridian.
    pub exclude_antimeridian: bool,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            override_cache: false,
            cache: true,
            exclude_antimeridian: false,
        }
    }
}

/// Options for [`Mesh::to_polygon_collection`](crate::topology::mesh::Mesh::to_polygon_collection).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionOptions {
    pub periodic_elements: PeriodicElements,
    /// Also hand back the per-ring source-face indices.
    pub return_indices: bool,
    pub cache: bool,
    pub override_cache: bool,
}

impl Default for CollectionOptions {
    fn default() -> Self {
        Self {
            periodic_elements: PeriodicElements::Exclude,
            return_indices: false,
            cache: true,
            override_cache: false,
        }
    }
}

/// Maps geographic `(lon, lat)` degrees onto a planar rendering surface.
pub trait Projection {
    fn project(&self, lon: f64, lat: f64) -> [f64; 2];
}

/// Equirectangular projection centred on `central_longitude`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlateCarree {
    pub central_longitude: f64,
}

impl Projection for PlateCarree {
    fn project(&self, lon: f64, lat: f64) -> [f64; 2] {
        let mut x = lon - self.central_longitude;
        if x > 180.0 {
            x -= 360.0;
        } else if x < -180.0 {
            x += 360.0;
        }
        [x, lat]
    }
}

/// One polygon per row plus the face each row came from.
#[derive(Clone, Debug, PartialEq)]
pub struct GeometryTable {
    geometry: Vec<Polygon<f64>>,
    source_face: Vec<usize>,
}

impl GeometryTable {
    /// Assemble rows from corrected parts. With `exclude_antimeridian`, the
    /// flagged faces are dropped before any row is emitted.
    pub fn build(
        corrected: &CorrectedPolygons,
        antimeridian_faces: &[usize],
        exclude_antimeridian: bool,
    ) -> Self {
        let mut geometry = Vec::with_capacity(corrected.len());
        let mut source_face = Vec::with_capacity(corrected.len());
        let mut flagged = antimeridian_faces.iter().copied().peekable();
        for face in 0..corrected.n_face() {
            let is_flagged = flagged.next_if_eq(&face).is_some();
            if exclude_antimeridian && is_flagged {
                continue;
            }
            for part in corrected.face_parts(face) {
                geometry.push(part.clone());
                source_face.push(face);
            }
        }
        Self {
            geometry,
            source_face,
        }
    }

    pub fn len(&self) -> usize {
        self.geometry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometry.is_empty()
    }

    /// The geometry column.
    pub fn geometry(&self) -> &[Polygon<f64>] {
        &self.geometry
    }

    /// Source face of every row.
    pub fn source_faces(&self) -> &[usize] {
        &self.source_face
    }
}

/// A geometry table joined with one face-centered data column.
#[derive(Clone, Debug)]
pub struct GeometryFrame<T> {
    table: Rc<GeometryTable>,
    name: String,
    column: Vec<T>,
}

impl<T: Clone> GeometryFrame<T> {
    /// Join `face_values` (one per face) onto `table` through its source-face
    /// column; split faces repeat their value on every part.
    pub fn join(table: Rc<GeometryTable>, name: impl Into<String>, face_values: &[T]) -> Self {
        let column = table
            .source_faces()
            .iter()
            .map(|&f| face_values[f].clone())
            .collect();
        Self {
            table,
            name: name.into(),
            column,
        }
    }
}

impl<T> GeometryFrame<T> {
    pub fn len(&self) -> usize {
        self.column.len()
    }

    pub fn is_empty(&self) -> bool {
        self.column.is_empty()
    }

    pub fn table(&self) -> &GeometryTable {
        &self.table
    }

    pub fn geometry(&self) -> &[Polygon<f64>] {
        self.table.geometry()
    }

    /// Name of the data column.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column(&self) -> &[T] {
        &self.column
    }
}

/// Rings of every rendered polygon, stored back to back.
#[derive(Clone, Debug, PartialEq)]
pub struct PolygonCollection {
    vertices: Vec<[f64; 2]>,
    ring_offsets: Vec<usize>,
    source_face: Vec<usize>,
}

impl PolygonCollection {
    /// Flatten faces into rings under the given antimeridian policy.
    ///
    /// `corrected` is only evaluated for [`PeriodicElements::Split`].
    pub fn build<F>(
        shells: &PolygonShells,
        antimeridian_faces: &[usize],
        corrected: F,
        policy: PeriodicElements,
        projection: Option<&dyn Projection>,
    ) -> Result<Self, MeshError>
    where
        F: FnOnce() -> Result<Rc<CorrectedPolygons>, MeshError>,
    {
        let mut out = Self {
            vertices: Vec::new(),
            ring_offsets: vec![0],
            source_face: Vec::new(),
        };
        let project = |p: [f64; 2]| match projection {
            Some(proj) => proj.project(p[0], p[1]),
            None => p,
        };

        match policy {
            PeriodicElements::Include | PeriodicElements::Exclude => {
                let mut flagged = antimeridian_faces.iter().copied().peekable();
                for face in 0..shells.len() {
                    let is_flagged = flagged.next_if_eq(&face).is_some();
                    if policy == PeriodicElements::Exclude && is_flagged {
                        continue;
                    }
                    out.push_ring(shells.shell(face).iter().dedup().map(|&p| project(p)), face);
                }
            }
            PeriodicElements::Split => {
                let corrected = corrected()?;
                for (part, &face) in corrected
                    .parts()
                    .iter()
                    .zip(corrected.original_to_corrected())
                {
                    out.push_ring(part.exterior().coords().map(|c| project([c.x, c.y])), face);
                }
            }
        }
        Ok(out)
    }

    fn push_ring(&mut self, ring: impl Iterator<Item = [f64; 2]>, face: usize) {
        self.vertices.extend(ring);
        self.ring_offsets.push(self.vertices.len());
        self.source_face.push(face);
    }

    /// Number of rings.
    pub fn len(&self) -> usize {
        self.source_face.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source_face.is_empty()
    }

    /// Ring `i` as a closed vertex slice.
    pub fn ring(&self, i: usize) -> &[[f64; 2]] {
        &self.vertices[self.ring_offsets[i]..self.ring_offsets[i + 1]]
    }

    pub fn rings(&self) -> impl Iterator<Item = &[[f64; 2]]> + '_ {
        (0..self.len()).map(move |i| self.ring(i))
    }

    /// All vertices, ring after ring.
    pub fn vertices(&self) -> &[[f64; 2]] {
        &self.vertices
    }

    /// `ring_offsets[i]..ring_offsets[i + 1]` indexes ring `i` in [`Self::vertices`].
    pub fn ring_offsets(&self) -> &[usize] {
        &self.ring_offsets
    }

    /// Source face of every ring.
    pub fn source_faces(&self) -> &[usize] {
        &self.source_face
    }
}

/// A polygon collection shaded by one value per ring.
#[derive(Clone, Debug)]
pub struct ShadedCollection<T> {
    collection: Rc<PolygonCollection>,
    array: Vec<T>,
}

impl<T: Clone> ShadedCollection<T> {
    /// Attach face-centered values to each ring via its source face.
    pub fn shade(collection: Rc<PolygonCollection>, face_values: &[T]) -> Self {
        let array = collection
            .source_faces()
            .iter()
            .map(|&f| face_values[f].clone())
            .collect();
        Self { collection, array }
    }
}

impl<T> ShadedCollection<T> {
    pub fn collection(&self) -> &PolygonCollection {
        &self.collection
    }

    /// One value per ring.
    pub fn array(&self) -> &[T] {
        &self.array
    }
}
