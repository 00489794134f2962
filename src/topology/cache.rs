//! Memoized derived products of a [`Mesh`](crate::topology::mesh::Mesh).
//!
//! Caches are plain single-threaded cells: nothing here is guarded by a lock,
//! and a mesh holding them is deliberately `!Sync`. Every slot is written only
//! after its product was computed successfully, so a failed computation never
//! leaves a half-filled entry behind.

use crate::geometry::corrected::CorrectedPolygons;
use crate::geometry::export::{GeometryTable, PeriodicElements, PolygonCollection};
use crate::geometry::shells::PolygonShells;
use crate::spatial::ball_tree::BallTree;
use crate::spatial::metric::{Euclidean, Haversine};
use crate::topology::element::ElementKind;
use hashbrown::HashMap;
use once_cell::unsync::OnceCell;
use std::cell::RefCell;
use std::rc::Rc;

/// Anything that caches derived geometry or indices should implement this.
pub trait InvalidateCache {
    /// Invalidate *all* internal caches so future queries recompute correctly.
    fn invalidate_cache(&mut self);
}

impl<T: InvalidateCache + ?Sized> InvalidateCache for Box<T> {
    #[inline]
    fn invalidate_cache(&mut self) {
        (**self).invalidate_cache();
    }
}

/// Cache slots owned by a mesh, keyed by the parameters that produced them.
#[derive(Default)]
pub(crate) struct MeshCache {
    pub polygon_shells: OnceCell<Rc<PolygonShells>>,
    pub antimeridian_faces: OnceCell<Rc<Vec<usize>>>,
    pub corrected_polygons: RefCell<Option<Rc<CorrectedPolygons>>>,
    pub face_areas: OnceCell<Rc<Vec<f64>>>,
    /// Keyed by `exclude_antimeridian`.
    pub geometry_tables: RefCell<HashMap<bool, Rc<GeometryTable>>>,
    /// Keyed by antimeridian policy; only unprojected collections are stored.
    pub collections: RefCell<HashMap<PeriodicElements, Rc<PolygonCollection>>>,
    pub spherical_trees: RefCell<HashMap<ElementKind, Rc<BallTree<Haversine>>>>,
    pub cartesian_trees: RefCell<HashMap<ElementKind, Rc<BallTree<Euclidean>>>>,
}

impl MeshCache {
    pub fn clear(&mut self) {
        *self = MeshCache::default();
    }
}

impl std::fmt::Debug for MeshCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeshCache")
            .field("polygon_shells", &self.polygon_shells.get().is_some())
            .field("antimeridian_faces", &self.antimeridian_faces.get().is_some())
            .field("corrected_polygons", &self.corrected_polygons.borrow().is_some())
            .field("geometry_tables", &self.geometry_tables.borrow().len())
            .field("collections", &self.collections.borrow().len())
            .field("spherical_trees", &self.spherical_trees.borrow().len())
            .field("cartesian_trees", &self.cartesian_trees.borrow().len())
            .finish()
    }
}

/// Clones start cold: cached products are rebuilt on demand.
impl Clone for MeshCache {
    fn clone(&self) -> Self {
        MeshCache::default()
    }
}

/// Shared lookup for keyed caches honoring the `override_cache` / `cache`
/// contract: a cached value is returned unless `override_cache` is set, and a
/// freshly built value is stored only when `cache` is set.
pub(crate) fn get_or_build<K, V, F>(
    slot: &RefCell<HashMap<K, Rc<V>>>,
    key: K,
    override_cache: bool,
    cache: bool,
    build: F,
) -> Result<Rc<V>, crate::mesh_error::MeshError>
where
    K: std::hash::Hash + Eq,
    F: FnOnce() -> Result<V, crate::mesh_error::MeshError>,
{
    if !override_cache {
        if let Some(hit) = slot.borrow().get(&key) {
            log::trace!("mesh cache hit");
            return Ok(Rc::clone(hit));
        }
    }
    let value = Rc::new(build()?);
    if cache {
        slot.borrow_mut().insert(key, Rc::clone(&value));
    }
    Ok(value)
}
