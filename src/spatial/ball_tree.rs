//! Immutable ball tree for nearest-neighbor queries.
//!
//! Nodes are stored in an arena; each covers a contiguous range of a
//! permutation of the input points and bounds them with a ball
//! `(center, radius)` under the tree's metric. Queries descend the closer
//! child first and prune any ball whose lower bound
//! `max(0, d(q, center) - radius)` exceeds the current best distance.
//!
//! Ties are resolved toward the smaller source index, so results depend only
//! on the input order, never on the tree layout.

use crate::mesh_error::MeshError;
use crate::spatial::metric::DistanceMetric;
use serde::{Deserialize, Serialize};
use static_assertions::assert_impl_all;

/// Construction parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallTreeOptions {
    /// Maximum number of points stored in a leaf.
    pub leaf_size: usize,
}

impl Default for BallTreeOptions {
    fn default() -> Self {
        Self { leaf_size: 40 }
    }
}

#[derive(Clone, Debug)]
struct BallNode {
    start: usize,
    end: usize,
    center: Vec<f64>,
    radius: f64,
    children: Option<(usize, usize)>,
}

/// A ball tree over a fixed point set.
#[derive(Clone, Debug)]
pub struct BallTree<M> {
    metric: M,
    dim: usize,
    /// Prepared coordinates, row `i` belongs to source index `i`.
    data: Vec<f64>,
    order: Vec<usize>,
    nodes: Vec<BallNode>,
}

assert_impl_all!(BallTree<crate::spatial::metric::Haversine>: Send, Sync);
assert_impl_all!(BallTree<crate::spatial::metric::Euclidean>: Send, Sync);

impl<M: DistanceMetric> BallTree<M> {
    /// Build a tree over `points`, given in the metric's user coordinates.
    pub fn build<const D: usize>(
        metric: M,
        points: &[[f64; D]],
        options: BallTreeOptions,
    ) -> Result<Self, MeshError> {
        if points.is_empty() {
            return Err(MeshError::EmptyIndex);
        }
        let dim = metric.dim();
        if dim != D {
            return Err(MeshError::InvalidShape(format!(
                "metric expects {dim} coordinates per point, got {D}"
            )));
        }
        let mut data = vec![0.0; points.len() * dim];
        for (row, p) in data.chunks_exact_mut(dim).zip(points) {
            metric.prepare(p, row);
        }

        let mut tree = Self {
            metric,
            dim,
            data,
            order: (0..points.len()).collect(),
            nodes: Vec::new(),
        };
        tree.build_node(0, points.len(), options.leaf_size.max(1));
        log::debug!(
            "built ball tree over {} points ({} nodes, leaf size {})",
            points.len(),
            tree.nodes.len(),
            options.leaf_size
        );
        Ok(tree)
    }

    fn point(&self, i: usize) -> &[f64] {
        &self.data[i * self.dim..(i + 1) * self.dim]
    }

    fn build_node(&mut self, start: usize, end: usize, leaf_size: usize) -> usize {
        let members = &self.order[start..end];
        let center = self.metric.center(members.iter().map(|&i| self.point(i)));
        let radius = members
            .iter()
            .map(|&i| self.metric.distance(&center, self.point(i)))
            .fold(0.0, f64::max);

        let id = self.nodes.len();
        self.nodes.push(BallNode {
            start,
            end,
            center,
            radius,
            children: None,
        });

        if end - start > leaf_size {
            let axis = self.widest_axis(start, end);
            let mid = start + (end - start) / 2;
            let (dim, data) = (self.dim, &self.data);
            self.order[start..end].select_nth_unstable_by(mid - start, |&a, &b| {
                data[a * dim + axis]
                    .total_cmp(&data[b * dim + axis])
                    .then(a.cmp(&b))
            });
            let left = self.build_node(start, mid, leaf_size);
            let right = self.build_node(mid, end, leaf_size);
            self.nodes[id].children = Some((left, right));
        }
        id
    }

    fn widest_axis(&self, start: usize, end: usize) -> usize {
        (0..self.dim)
            .map(|axis| {
                let (lo, hi) = self.order[start..end].iter().fold(
                    (f64::INFINITY, f64::NEG_INFINITY),
                    |(lo, hi), &i| {
                        let v = self.data[i * self.dim + axis];
                        (lo.min(v), hi.max(v))
                    },
                );
                (axis, hi - lo)
            })
            .fold((0, f64::NEG_INFINITY), |best, cur| if cur.1 > best.1 { cur } else { best })
            .0
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn metric(&self) -> &M {
        &self.metric
    }

    fn lower_bound(&self, node: &BallNode, q: &[f64]) -> f64 {
        (self.metric.distance(q, &node.center) - node.radius).max(0.0)
    }

    /// Distance to and index of the closest point to `point` (user
    /// coordinates).
    pub fn query_nearest(&self, point: &[f64]) -> (f64, usize) {
        let mut q = vec![0.0; self.dim];
        self.metric.prepare(point, &mut q);
        let mut best = (f64::INFINITY, usize::MAX);
        self.nearest_in(0, &q, &mut best);
        best
    }

    fn nearest_in(&self, id: usize, q: &[f64], best: &mut (f64, usize)) {
        let node = &self.nodes[id];
        if self.lower_bound(node, q) > best.0 {
            return;
        }
        match node.children {
            None => {
                for &i in &self.order[node.start..node.end] {
                    let d = self.metric.distance(q, self.point(i));
                    if d < best.0 || (d == best.0 && i < best.1) {
                        *best = (d, i);
                    }
                }
            }
            Some((left, right)) => {
                let dl = self.lower_bound(&self.nodes[left], q);
                let dr = self.lower_bound(&self.nodes[right], q);
                let (first, second) = if dl <= dr { (left, right) } else { (right, left) };
                self.nearest_in(first, q, best);
                self.nearest_in(second, q, best);
            }
        }
    }

    /// The `k` closest points as `(distance, index)`, nearest first.
    pub fn query(&self, point: &[f64], k: usize) -> Vec<(f64, usize)> {
        let mut q = vec![0.0; self.dim];
        self.metric.prepare(point, &mut q);
        let mut heap: Vec<(f64, usize)> = Vec::with_capacity(k + 1);
        if k > 0 {
            self.knn_in(0, &q, k, &mut heap);
        }
        heap
    }

    fn knn_in(&self, id: usize, q: &[f64], k: usize, found: &mut Vec<(f64, usize)>) {
        let node = &self.nodes[id];
        let worst = |found: &Vec<(f64, usize)>| {
            if found.len() < k { f64::INFINITY } else { found[k - 1].0 }
        };
        if self.lower_bound(node, q) > worst(found) {
            return;
        }
        match node.children {
            None => {
                for &i in &self.order[node.start..node.end] {
                    let candidate = (self.metric.distance(q, self.point(i)), i);
                    let pos = found.partition_point(|probe| {
                        probe.0 < candidate.0 || (probe.0 == candidate.0 && probe.1 < candidate.1)
                    });
                    if pos < k {
                        found.insert(pos, candidate);
                        found.truncate(k);
                    }
                }
            }
            Some((left, right)) => {
                let dl = self.lower_bound(&self.nodes[left], q);
                let dr = self.lower_bound(&self.nodes[right], q);
                let (first, second) = if dl <= dr { (left, right) } else { (right, left) };
                self.knn_in(first, q, k, found);
                self.knn_in(second, q, k, found);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::metric::{Euclidean, Haversine};
    use proptest::prelude::*;

    fn brute_nearest<M: DistanceMetric>(m: &M, pts: &[Vec<f64>], q: &[f64]) -> (f64, usize) {
        let mut prepared_q = vec![0.0; m.dim()];
        m.prepare(q, &mut prepared_q);
        let mut best = (f64::INFINITY, usize::MAX);
        for (i, p) in pts.iter().enumerate() {
            let mut pp = vec![0.0; m.dim()];
            m.prepare(p, &mut pp);
            let d = m.distance(&prepared_q, &pp);
            if d < best.0 {
                best = (d, i);
            }
        }
        best
    }

    #[test]
    fn empty_point_set_is_rejected() {
        let pts: [[f64; 3]; 0] = [];
        assert!(matches!(
            BallTree::build(Euclidean, &pts, BallTreeOptions::default()),
            Err(MeshError::EmptyIndex)
        ));
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        assert!(matches!(
            BallTree::build(Haversine, &[[0.0, 0.0, 1.0]], BallTreeOptions::default()),
            Err(MeshError::InvalidShape(_))
        ));
    }

    #[test]
    fn ties_prefer_lower_index() {
        let pts = [[1.0, 0.0, 0.0], [-1.0, 0.0, 0.0], [1.0, 0.0, 0.0]];
        let tree = BallTree::build(Euclidean, &pts, BallTreeOptions { leaf_size: 1 }).unwrap();
        assert_eq!(tree.query_nearest(&[1.0, 0.0, 0.0]).1, 0);
        assert_eq!(tree.query_nearest(&[0.0, 0.0, 0.0]).1, 0);
        let knn = tree.query(&[1.0, 0.0, 0.0], 2);
        assert_eq!(knn.iter().map(|p| p.1).collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn nearest_across_the_seam() {
        let pts = [[179.9, 0.0], [0.0, 0.0], [-90.0, 0.0]];
        let tree = BallTree::build(Haversine, &pts, BallTreeOptions::default()).unwrap();
        assert_eq!(tree.query_nearest(&[-179.9, 0.0]).1, 0);
    }

    proptest! {
        #[test]
        fn euclidean_matches_brute_force(
            pts in prop::collection::vec(prop::array::uniform3(-1.0f64..1.0), 1..200),
            q in prop::array::uniform3(-1.0f64..1.0),
            leaf in 1usize..16,
        ) {
            let tree =
                BallTree::build(Euclidean, &pts, BallTreeOptions { leaf_size: leaf }).unwrap();
            let as_vec: Vec<Vec<f64>> = pts.iter().map(|p| p.to_vec()).collect();
            let (bd, _) = brute_nearest(&Euclidean, &as_vec, &q);
            let (td, ti) = tree.query_nearest(&q);
            prop_assert!((td - bd).abs() < 1e-12);
            prop_assert!((Euclidean.distance(&q, &pts[ti]) - bd).abs() < 1e-12);
        }

        #[test]
        fn haversine_matches_brute_force(
            pts in prop::collection::vec((-180.0f64..180.0, -89.0f64..89.0), 1..200),
            q in (-180.0f64..180.0, -89.0f64..89.0),
            k in 1usize..5,
        ) {
            let pts: Vec<[f64; 2]> = pts.into_iter().map(|(a, b)| [a, b]).collect();
            let q = [q.0, q.1];
            let tree = BallTree::build(Haversine, &pts, BallTreeOptions { leaf_size: 4 }).unwrap();
            let as_vec: Vec<Vec<f64>> = pts.iter().map(|p| p.to_vec()).collect();
            let (bd, _) = brute_nearest(&Haversine, &as_vec, &q);
            prop_assert!((tree.query_nearest(&q).0 - bd).abs() < 1e-9);
            let knn = tree.query(&q, k);
            prop_assert_eq!(knn.len(), k.min(pts.len()));
            prop_assert!((knn[0].0 - bd).abs() < 1e-9);
            prop_assert!(knn.windows(2).all(|w| w[0].0 <= w[1].0));
        }
    }
}
