//! Mesh subsetting by element index.

use crate::mesh_error::MeshError;
use crate::topology::element::ElementKind;
use crate::topology::mesh::Mesh;
use hashbrown::HashMap;
use itertools::Itertools;

/// Maps from subset-local indices back to the parent mesh.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubsetIndices {
    pub face_indices: Vec<usize>,
    pub edge_indices: Vec<usize>,
    pub node_indices: Vec<usize>,
}

impl SubsetIndices {
    /// Parent indices of the subset's `kind` elements.
    pub fn of(&self, kind: ElementKind) -> &[usize] {
        match kind {
            ElementKind::Node => &self.node_indices,
            ElementKind::Edge => &self.edge_indices,
            ElementKind::Face => &self.face_indices,
        }
    }
}

impl Mesh {
    /// Subset the mesh to the faces touching the selected elements.
    ///
    /// Selection is inclusive: a face is kept when it is selected or contains
    /// a selected node or edge. Kept faces, and the nodes and edges they use,
    /// appear in ascending parent order.
    pub fn isel(
        &self,
        kind: ElementKind,
        indices: &[usize],
    ) -> Result<(Mesh, SubsetIndices), MeshError> {
        let count = self.count(kind);
        if let Some(&bad) = indices.iter().find(|&&i| i >= count) {
            return Err(MeshError::InvalidArgument {
                argument: "indices",
                value: bad.to_string(),
                expected: "indices below the element count",
            });
        }

        let faces: Vec<usize> = match kind {
            ElementKind::Face => indices.iter().copied().sorted_unstable().dedup().collect(),
            ElementKind::Node => indices
                .iter()
                .flat_map(|&n| self.node_face_connectivity().real_row(n).iter().copied())
                .sorted_unstable()
                .dedup()
                .collect(),
            ElementKind::Edge => indices
                .iter()
                .flat_map(|&e| self.edge_face_connectivity().real_row(e).iter().copied())
                .sorted_unstable()
                .dedup()
                .collect(),
        };
        if faces.is_empty() {
            return Err(MeshError::InvalidTopology(format!(
                "selecting {} {kind}(s) leaves no faces",
                indices.len()
            )));
        }

        let face_node = self.face_node_connectivity();
        let nodes: Vec<usize> = faces
            .iter()
            .flat_map(|&f| face_node.real_row(f).iter().copied())
            .sorted_unstable()
            .dedup()
            .collect();
        let local: HashMap<usize, usize> = nodes.iter().enumerate().map(|(l, &n)| (n, l)).collect();
        let rows: Vec<Vec<usize>> = faces
            .iter()
            .map(|&f| face_node.real_row(f).iter().map(|n| local[n]).collect())
            .collect();
        let lon = nodes.iter().map(|&n| self.node_lon()[n]).collect();
        let lat = nodes.iter().map(|&n| self.node_lat()[n]).collect();
        let subset = Mesh::from_faces(lon, lat, &rows)?;

        let parent_edge: HashMap<(usize, usize), usize> = (0..self.n_edge())
            .map(|e| {
                let row = self.edge_node_connectivity().row(e);
                ((row[0], row[1]), e)
            })
            .collect();
        let edges = (0..subset.n_edge())
            .map(|e| {
                let row = subset.edge_node_connectivity().row(e);
                let (a, b) = (nodes[row[0]], nodes[row[1]]);
                parent_edge
                    .get(&(a.min(b), a.max(b)))
                    .copied()
                    .ok_or_else(|| {
                        MeshError::InvalidTopology(format!(
                            "subset edge ({a}, {b}) has no parent edge"
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!(
            "subset by {} {kind}(s): {} faces, {} edges, {} nodes",
            indices.len(),
            faces.len(),
            edges.len(),
            nodes.len()
        );
        Ok((
            subset,
            SubsetIndices {
                face_indices: faces,
                edge_indices: edges,
                node_indices: nodes,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip() -> Mesh {
        // Three unit quads in a row.
        Mesh::from_faces(
            vec![0.0, 1.0, 2.0, 3.0, 0.0, 1.0, 2.0, 3.0],
            vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0],
            &[vec![0, 1, 5, 4], vec![1, 2, 6, 5], vec![2, 3, 7, 6]],
        )
        .unwrap()
    }

    #[test]
    fn face_selection_keeps_used_nodes() {
        let mesh = strip();
        let (sub, idx) = mesh.isel(ElementKind::Face, &[2]).unwrap();
        assert_eq!(sub.n_face(), 1);
        assert_eq!(idx.face_indices, vec![2]);
        assert_eq!(idx.node_indices, vec![2, 3, 6, 7]);
        assert_eq!(idx.edge_indices.len(), 4);
        for (l, &p) in idx.edge_indices.iter().enumerate() {
            let sub_nodes: Vec<usize> = sub
                .edge_node_connectivity()
                .row(l)
                .iter()
                .map(|&n| idx.node_indices[n])
                .collect();
            let mut parent_nodes = mesh.edge_node_connectivity().row(p).to_vec();
            parent_nodes.sort_unstable();
            assert_eq!(sub_nodes, parent_nodes);
        }
    }

    #[test]
    fn node_selection_is_inclusive() {
        let (sub, idx) = strip().isel(ElementKind::Node, &[1]).unwrap();
        assert_eq!(idx.face_indices, vec![0, 1]);
        assert_eq!(sub.n_node(), 6);
    }

    #[test]
    fn out_of_range_is_rejected() {
        assert!(matches!(
            strip().isel(ElementKind::Face, &[3]),
            Err(MeshError::InvalidArgument { argument: "indices", .. })
        ));
        assert!(matches!(
            strip().isel(ElementKind::Face, &[]),
            Err(MeshError::InvalidTopology(_))
        ));
    }
}
