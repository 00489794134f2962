//! The unstructured mesh: node coordinates, face→node connectivity and
//! everything derived from them.
//!
//! A [`Mesh`] is immutable after construction apart from its memoized caches
//! (polygon shells, corrected geometry, spatial indices, face areas). Those
//! caches live in unguarded single-threaded cells, so a mesh stays on the
//! thread that built it; callers needing cross-thread access serialize it
//! themselves.

use crate::geometry::antimeridian::antimeridian_face_indices;
use crate::geometry::area::face_areas;
use crate::geometry::coordinates::{lonlat_to_xyz, normalize, xyz_to_lonlat};
use crate::geometry::corrected::CorrectedPolygons;
use crate::geometry::export::{
    CollectionOptions, GeometryTable, PolygonCollection, Projection, TableOptions,
};
use crate::geometry::shells::PolygonShells;
use crate::mesh_error::MeshError;
use crate::spatial::ball_tree::{BallTree, BallTreeOptions};
use crate::spatial::metric::{Euclidean, Haversine};
use crate::topology::cache::{InvalidateCache, MeshCache, get_or_build};
use crate::topology::connectivity::{Connectivity, derive_connectivity};
use crate::topology::element::{CoordSystem, ElementKind};
use static_assertions::assert_not_impl_any;
use std::rc::Rc;

/// A 2D unstructured mesh on the sphere.
#[derive(Clone, Debug)]
pub struct Mesh {
    node_lon: Vec<f64>,
    node_lat: Vec<f64>,
    node_xyz: Vec<[f64; 3]>,
    face_node: Connectivity,
    nodes_per_face: Vec<usize>,
    edge_node: Connectivity,
    edge_face: Connectivity,
    face_edge: Connectivity,
    node_face: Connectivity,
    node_edge: Connectivity,
    face_lon: Vec<f64>,
    face_lat: Vec<f64>,
    face_xyz: Vec<[f64; 3]>,
    edge_lon: Vec<f64>,
    edge_lat: Vec<f64>,
    edge_xyz: Vec<[f64; 3]>,
    cache: MeshCache,
}

assert_not_impl_any!(Mesh: Sync);

impl Mesh {
    /// Build a mesh from node longitudes/latitudes (degrees) and ragged face
    /// rows of node indices.
    pub fn from_faces(
        node_lon: Vec<f64>,
        node_lat: Vec<f64>,
        faces: &[Vec<usize>],
    ) -> Result<Self, MeshError> {
        Self::from_connectivity(node_lon, node_lat, Connectivity::from_rows(faces))
    }

    /// Build a mesh from a fill-padded face→node table with
    /// `n_max_face_nodes` columns.
    pub fn from_face_node_table(
        node_lon: Vec<f64>,
        node_lat: Vec<f64>,
        face_nodes: Vec<usize>,
        n_max_face_nodes: usize,
    ) -> Result<Self, MeshError> {
        let table = Connectivity::new(n_max_face_nodes, face_nodes)?;
        Self::from_connectivity(node_lon, node_lat, table)
    }

    fn from_connectivity(
        node_lon: Vec<f64>,
        node_lat: Vec<f64>,
        face_node: Connectivity,
    ) -> Result<Self, MeshError> {
        if node_lon.len() != node_lat.len() {
            return Err(MeshError::InvalidTopology(format!(
                "node longitude ({}) and latitude ({}) arrays differ in length",
                node_lon.len(),
                node_lat.len()
            )));
        }
        if let Some(n) = node_lon
            .iter()
            .zip(&node_lat)
            .position(|(lon, lat)| !lon.is_finite() || !lat.is_finite())
        {
            return Err(MeshError::InvalidTopology(format!(
                "node {n} has non-finite coordinates ({}, {})",
                node_lon[n], node_lat[n]
            )));
        }
        let n_node = node_lon.len();
        face_node.validate(n_node, "face_node")?;
        let nodes_per_face = face_node.row_lengths();
        if let Some(f) = nodes_per_face.iter().position(|&n| n < 3) {
            return Err(MeshError::InvalidTopology(format!(
                "face {f} has {} nodes; at least 3 are required",
                nodes_per_face[f]
            )));
        }

        let node_xyz: Vec<[f64; 3]> = node_lon
            .iter()
            .zip(&node_lat)
            .map(|(&lon, &lat)| lonlat_to_xyz(lon, lat))
            .collect();

        let derived = derive_connectivity(&face_node, n_node);

        let face_xyz: Vec<[f64; 3]> = (0..face_node.n_rows())
            .map(|f| centroid(face_node.real_row(f), &node_xyz))
            .collect();
        let edge_xyz: Vec<[f64; 3]> = (0..derived.edge_node.n_rows())
            .map(|e| centroid(derived.edge_node.real_row(e), &node_xyz))
            .collect();
        let (face_lon, face_lat) = face_xyz.iter().map(|&p| xyz_to_lonlat(p)).unzip();
        let (edge_lon, edge_lat) = edge_xyz.iter().map(|&p| xyz_to_lonlat(p)).unzip();

        log::debug!(
            "constructed mesh: {n_node} nodes, {} edges, {} faces",
            derived.edge_node.n_rows(),
            face_node.n_rows()
        );

        Ok(Self {
            node_lon,
            node_lat,
            node_xyz,
            face_node,
            nodes_per_face,
            edge_node: derived.edge_node,
            edge_face: derived.edge_face,
            face_edge: derived.face_edge,
            node_face: derived.node_face,
            node_edge: derived.node_edge,
            face_lon,
            face_lat,
            face_xyz,
            edge_lon,
            edge_lat,
            edge_xyz,
            cache: MeshCache::default(),
        })
    }

    #[inline]
    pub fn n_node(&self) -> usize {
        self.node_lon.len()
    }

    #[inline]
    pub fn n_edge(&self) -> usize {
        self.edge_node.n_rows()
    }

    #[inline]
    pub fn n_face(&self) -> usize {
        self.face_node.n_rows()
    }

    /// Maximum number of nodes of any face (columns of the face→node table).
    #[inline]
    pub fn n_max_face_nodes(&self) -> usize {
        self.face_node.n_cols()
    }

    /// Number of elements of the given kind.
    pub fn count(&self, kind: ElementKind) -> usize {
        match kind {
            ElementKind::Node => self.n_node(),
            ElementKind::Edge => self.n_edge(),
            ElementKind::Face => self.n_face(),
        }
    }

    /// Real node count of every face.
    pub fn nodes_per_face(&self) -> &[usize] {
        &self.nodes_per_face
    }

    pub fn node_lon(&self) -> &[f64] {
        &self.node_lon
    }

    pub fn node_lat(&self) -> &[f64] {
        &self.node_lat
    }

    /// Longitudes and latitudes (degrees) of the given element kind.
    pub fn lonlat(&self, kind: ElementKind) -> (&[f64], &[f64]) {
        match kind {
            ElementKind::Node => (&self.node_lon, &self.node_lat),
            ElementKind::Edge => (&self.edge_lon, &self.edge_lat),
            ElementKind::Face => (&self.face_lon, &self.face_lat),
        }
    }

    /// Unit-sphere Cartesian coordinates of the given element kind.
    pub fn xyz(&self, kind: ElementKind) -> &[[f64; 3]] {
        match kind {
            ElementKind::Node => &self.node_xyz,
            ElementKind::Edge => &self.edge_xyz,
            ElementKind::Face => &self.face_xyz,
        }
    }

    pub fn face_node_connectivity(&self) -> &Connectivity {
        &self.face_node
    }

    pub fn edge_node_connectivity(&self) -> &Connectivity {
        &self.edge_node
    }

    /// Two faces per edge; the second slot holds the fill value on boundaries.
    pub fn edge_face_connectivity(&self) -> &Connectivity {
        &self.edge_face
    }

    pub fn face_edge_connectivity(&self) -> &Connectivity {
        &self.face_edge
    }

    pub fn node_face_connectivity(&self) -> &Connectivity {
        &self.node_face
    }

    pub fn node_edge_connectivity(&self) -> &Connectivity {
        &self.node_edge
    }

    /// Closed polygon shells of every face (memoized).
    pub fn polygon_shells(&self) -> Rc<PolygonShells> {
        Rc::clone(self.cache.polygon_shells.get_or_init(|| {
            Rc::new(PolygonShells::build(
                &self.node_lon,
                &self.node_lat,
                &self.face_node,
                &self.nodes_per_face,
                self.n_face(),
            ))
        }))
    }

    /// Indices of faces whose shells cross the antimeridian (memoized).
    pub fn antimeridian_face_indices(&self) -> Rc<Vec<usize>> {
        Rc::clone(
            self.cache
                .antimeridian_faces
                .get_or_init(|| Rc::new(antimeridian_face_indices(&self.polygon_shells()))),
        )
    }

    /// Antimeridian-corrected polygon parts with their source-face map
    /// (memoized once built successfully).
    pub fn corrected_polygons(&self) -> Result<Rc<CorrectedPolygons>, MeshError> {
        self.corrected_polygons_with(false, true)
    }

    /// [`corrected_polygons`](Self::corrected_polygons) under the
    /// `override_cache` / `cache` contract of the export options.
    pub fn corrected_polygons_with(
        &self,
        override_cache: bool,
        cache: bool,
    ) -> Result<Rc<CorrectedPolygons>, MeshError> {
        if !override_cache {
            if let Some(hit) = self.cache.corrected_polygons.borrow().as_ref() {
                return Ok(Rc::clone(hit));
            }
        }
        let shells = self.polygon_shells();
        let flagged = self.antimeridian_face_indices();
        let corrected = Rc::new(CorrectedPolygons::build(&shells, &flagged)?);
        if cache {
            *self.cache.corrected_polygons.borrow_mut() = Some(Rc::clone(&corrected));
        }
        Ok(corrected)
    }

    /// Geometry table of the mesh faces, cached per `exclude_antimeridian`.
    pub fn to_geometry_table(
        &self,
        options: &TableOptions,
    ) -> Result<Rc<GeometryTable>, MeshError> {
        get_or_build(
            &self.cache.geometry_tables,
            options.exclude_antimeridian,
            options.override_cache,
            options.cache,
            || {
                let corrected =
                    self.corrected_polygons_with(options.override_cache, options.cache)?;
                let flagged = self.antimeridian_face_indices();
                Ok(GeometryTable::build(
                    &corrected,
                    &flagged,
                    options.exclude_antimeridian,
                ))
            },
        )
    }

    /// Flat polygon collection of the mesh faces, cached per antimeridian
    /// policy. Collections built with a projection are never cached.
    pub fn to_polygon_collection(
        &self,
        options: &CollectionOptions,
        projection: Option<&dyn Projection>,
    ) -> Result<Rc<PolygonCollection>, MeshError> {
        let build = || {
            let shells = self.polygon_shells();
            let flagged = self.antimeridian_face_indices();
            PolygonCollection::build(
                &shells,
                &flagged,
                || self.corrected_polygons_with(options.override_cache, options.cache),
                options.periodic_elements,
                projection,
            )
        };
        match projection {
            Some(_) => build().map(Rc::new),
            None => get_or_build(
                &self.cache.collections,
                options.periodic_elements,
                options.override_cache,
                options.cache,
                build,
            ),
        }
    }

    /// Ball tree over the lon/lat of `kind`, using the haversine metric.
    ///
    /// A cached tree is returned unless `override_cache`; a built tree is
    /// stored only when `cache`.
    pub fn spherical_ball_tree(
        &self,
        kind: ElementKind,
        override_cache: bool,
        cache: bool,
    ) -> Result<Rc<BallTree<Haversine>>, MeshError> {
        get_or_build(&self.cache.spherical_trees, kind, override_cache, cache, || {
            let (lon, lat) = self.lonlat(kind);
            let points: Vec<[f64; 2]> = lon.iter().zip(lat).map(|(&x, &y)| [x, y]).collect();
            BallTree::build(Haversine, &points, BallTreeOptions::default())
        })
    }

    /// Ball tree over the unit-sphere x/y/z of `kind`, using Euclidean distance.
    pub fn cartesian_ball_tree(
        &self,
        kind: ElementKind,
        override_cache: bool,
        cache: bool,
    ) -> Result<Rc<BallTree<Euclidean>>, MeshError> {
        get_or_build(&self.cache.cartesian_trees, kind, override_cache, cache, || {
            BallTree::build(Euclidean, self.xyz(kind), BallTreeOptions::default())
        })
    }

    /// Index of the nearest `source_kind` element for every query point.
    ///
    /// Query points are `(lon, lat)` pairs for [`CoordSystem::Spherical`]
    /// and taken from `query_xyz` for [`CoordSystem::Cartesian`].
    pub(crate) fn nearest_elements(
        &self,
        source_kind: ElementKind,
        coord_type: CoordSystem,
        query_lonlat: (&[f64], &[f64]),
        query_xyz: &[[f64; 3]],
    ) -> Result<Vec<usize>, MeshError> {
        match coord_type {
            CoordSystem::Spherical => {
                let tree = self.spherical_ball_tree(source_kind, false, true)?;
                let (lon, lat) = query_lonlat;
                Ok(lon
                    .iter()
                    .zip(lat)
                    .map(|(&x, &y)| tree.query_nearest(&[x, y]).1)
                    .collect())
            }
            CoordSystem::Cartesian => {
                let tree = self.cartesian_ball_tree(source_kind, false, true)?;
                Ok(query_xyz.iter().map(|p| tree.query_nearest(p).1).collect())
            }
        }
    }

    /// Spherical area of every face on the unit sphere (memoized).
    pub fn face_areas(&self) -> Rc<Vec<f64>> {
        Rc::clone(
            self.cache
                .face_areas
                .get_or_init(|| Rc::new(face_areas(&self.face_node, &self.node_xyz))),
        )
    }

    /// Sum of all face areas on the unit sphere.
    pub fn total_face_area(&self) -> f64 {
        self.face_areas().iter().sum()
    }
}

impl InvalidateCache for Mesh {
    fn invalidate_cache(&mut self) {
        self.cache.clear();
    }
}

/// Normalized mean of the referenced unit vectors.
fn centroid(nodes: &[usize], node_xyz: &[[f64; 3]]) -> [f64; 3] {
    let mut sum = [0.0; 3];
    for &n in nodes {
        for (acc, v) in sum.iter_mut().zip(node_xyz[n]) {
            *acc += v;
        }
    }
    normalize(sum)
}
