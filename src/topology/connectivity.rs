//! Fill-padded connectivity tables and their derivation from face→node data.
//!
//! Every table is a dense row-major `rows x cols` array of element indices.
//! Rows shorter than `cols` are padded with [`FILL_VALUE`] in their trailing
//! slots; fill values never appear between real indices.

use crate::mesh_error::MeshError;
use hashbrown::HashMap;
use itertools::Itertools;

/// Sentinel for unused slots in variable-length connectivity rows.
pub const FILL_VALUE: usize = usize::MAX;

/// A dense, fill-padded connectivity table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Connectivity {
    cols: usize,
    data: Vec<usize>,
}

impl Connectivity {
    /// Wrap a row-major table with `cols` columns.
    pub fn new(cols: usize, data: Vec<usize>) -> Result<Self, MeshError> {
        if cols == 0 && !data.is_empty() {
            return Err(MeshError::InvalidTopology(
                "connectivity with zero columns must be empty".into(),
            ));
        }
        if cols != 0 && data.len() % cols != 0 {
            return Err(MeshError::InvalidTopology(format!(
                "connectivity length {} is not a multiple of {cols} columns",
                data.len()
            )));
        }
        Ok(Self { cols, data })
    }

    /// Build a padded table from ragged rows.
    pub fn from_rows<R: AsRef<[usize]>>(rows: &[R]) -> Self {
        let cols = rows.iter().map(|r| r.as_ref().len()).max().unwrap_or(0);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            let row = row.as_ref();
            data.extend_from_slice(row);
            data.extend(std::iter::repeat_n(FILL_VALUE, cols - row.len()));
        }
        Self { cols, data }
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        if self.cols == 0 { 0 } else { self.data.len() / self.cols }
    }

    #[inline]
    pub fn n_cols(&self) -> usize {
        self.cols
    }

    /// The padded row `i`, fill values included.
    #[inline]
    pub fn row(&self, i: usize) -> &[usize] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Real (non-fill) entries of row `i`.
    #[inline]
    pub fn real_row(&self, i: usize) -> &[usize] {
        let row = self.row(i);
        let len = row.iter().position(|&v| v == FILL_VALUE).unwrap_or(row.len());
        &row[..len]
    }

    /// Number of real entries per row.
    pub fn row_lengths(&self) -> Vec<usize> {
        (0..self.n_rows()).map(|i| self.real_row(i).len()).collect()
    }

    /// Raw row-major storage.
    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.data
    }

    /// Check the padding invariant and that every real index is `< bound`.
    pub fn validate(&self, bound: usize, what: &str) -> Result<(), MeshError> {
        for i in 0..self.n_rows() {
            let row = self.row(i);
            let real = self.real_row(i).len();
            if row[real..].iter().any(|&v| v != FILL_VALUE) {
                return Err(MeshError::InvalidTopology(format!(
                    "{what} row {i} has a fill value between real indices"
                )));
            }
            if let Some(&bad) = row[..real].iter().find(|&&v| v >= bound) {
                return Err(MeshError::InvalidTopology(format!(
                    "{what} row {i} references index {bad}, but only {bound} exist"
                )));
            }
        }
        Ok(())
    }
}

/// Connectivity derived from the face→node table.
#[derive(Clone, Debug)]
pub(crate) struct DerivedConnectivity {
    pub edge_node: Connectivity,
    pub edge_face: Connectivity,
    pub face_edge: Connectivity,
    pub node_face: Connectivity,
    pub node_edge: Connectivity,
}

/// Derive edges and all incidence tables from `face_node`.
///
/// Edges are the unique undirected node pairs of the closed face rings,
/// ordered lexicographically by `(min node, max node)`.
pub(crate) fn derive_connectivity(face_node: &Connectivity, n_node: usize) -> DerivedConnectivity {
    let n_face = face_node.n_rows();

    let mut face_pairs: Vec<Vec<(usize, usize)>> = Vec::with_capacity(n_face);
    for f in 0..n_face {
        let nodes = face_node.real_row(f);
        let pairs = nodes
            .iter()
            .copied()
            .circular_tuple_windows()
            .filter(|(a, b)| a != b)
            .map(|(a, b)| (a.min(b), a.max(b)))
            .collect();
        face_pairs.push(pairs);
    }

    let unique: Vec<(usize, usize)> = face_pairs
        .iter()
        .flatten()
        .copied()
        .sorted_unstable()
        .dedup()
        .collect();
    let edge_id: HashMap<(usize, usize), usize> =
        unique.iter().enumerate().map(|(i, &pair)| (pair, i)).collect();
    let n_edge = unique.len();
    log::debug!("derived {n_edge} edges from {n_face} faces");

    let edge_node_rows: Vec<[usize; 2]> = unique.iter().map(|&(a, b)| [a, b]).collect();

    let mut face_edge_rows: Vec<Vec<usize>> = Vec::with_capacity(n_face);
    let mut edge_faces: Vec<Vec<usize>> = vec![Vec::new(); n_edge];
    for (f, pairs) in face_pairs.iter().enumerate() {
        let mut row = Vec::with_capacity(pairs.len());
        for pair in pairs {
            let e = edge_id[pair];
            row.push(e);
            if !edge_faces[e].contains(&f) {
                edge_faces[e].push(f);
            }
        }
        face_edge_rows.push(row);
    }
    // Manifold 2D meshes have at most two faces per edge; keep the first two.
    let edge_face_rows: Vec<[usize; 2]> = edge_faces
        .iter()
        .map(|faces| {
            [
                faces.first().copied().unwrap_or(FILL_VALUE),
                faces.get(1).copied().unwrap_or(FILL_VALUE),
            ]
        })
        .collect();

    let mut node_faces: Vec<Vec<usize>> = vec![Vec::new(); n_node];
    for f in 0..n_face {
        for &n in face_node.real_row(f).iter().unique() {
            node_faces[n].push(f);
        }
    }
    let mut node_edges: Vec<Vec<usize>> = vec![Vec::new(); n_node];
    for (e, &(a, b)) in unique.iter().enumerate() {
        node_edges[a].push(e);
        node_edges[b].push(e);
    }

    DerivedConnectivity {
        edge_node: Connectivity::from_rows(&edge_node_rows),
        edge_face: Connectivity::from_rows(&edge_face_rows),
        face_edge: Connectivity::from_rows(&face_edge_rows),
        node_face: Connectivity::from_rows(&node_faces),
        node_edge: Connectivity::from_rows(&node_edges),
    }
}
