mod util;

use approx::assert_abs_diff_eq;
use proptest::prelude::*;
use std::f64::consts::PI;
use ugrid_geo::prelude::*;
use util::{face_ramp, lonlat_grid};

fn strip() -> Mesh {
    // 0 - 1 - 2
    // | 0 | 1 |
    // 3 - 4 - 5
    Mesh::from_faces(
        vec![0.0, 1.0, 2.0, 0.0, 1.0, 2.0],
        vec![1.0, 1.0, 1.0, 0.0, 0.0, 0.0],
        &[vec![3, 4, 1, 0], vec![4, 5, 2, 1]],
    )
    .unwrap()
}

#[test]
fn node_to_face_mean_matches_nodal_average() {
    let mesh = strip();
    let data = DataField::from_vec("n_node", vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let field = MeshField::new(&mesh, data);
    let mean = field
        .topological_aggregate(ElementKind::Face, Aggregation::Mean)
        .unwrap();
    assert_eq!(mean.values(), &[3.0, 4.0]);
    assert_eq!(field.nodal_average().unwrap().values(), mean.values());
    let max = field.topological_aggregate_by_name("faces", "max").unwrap();
    assert_eq!(max.values(), &[5.0, 6.0]);
}

#[test]
fn face_to_node_counts_only_real_neighbors() {
    let mesh = strip();
    let field = MeshField::new(&mesh, DataField::from_vec("n_face", vec![2.0, 6.0]));
    let sum = field
        .topological_aggregate(ElementKind::Node, Aggregation::Sum)
        .unwrap();
    assert_eq!(sum.values(), &[2.0, 8.0, 6.0, 2.0, 8.0, 6.0]);
    let edge_mean = field
        .topological_aggregate(ElementKind::Edge, Aggregation::Mean)
        .unwrap();
    assert_eq!(edge_mean.values().len(), mesh.n_edge());
    assert!(edge_mean.values().contains(&4.0));
}

#[test]
fn same_kind_aggregation_is_unsupported() {
    let mesh = strip();
    let field = MeshField::new(&mesh, DataField::from_vec("n_face", vec![2.0, 6.0]));
    assert!(matches!(
        field.topological_aggregate(ElementKind::Face, Aggregation::Mean),
        Err(MeshError::UnsupportedCombination {
            from: ElementKind::Face,
            to: ElementKind::Face,
            ..
        })
    ));
    assert!(matches!(
        field.topological_aggregate_by_name("cells", "mean"),
        Err(MeshError::InvalidArgument { argument: "destination", .. })
    ));
}

#[test]
fn differences_across_edges() {
    let mesh = strip();
    let faces = MeshField::new(&mesh, DataField::from_vec("n_face", vec![2.0, 6.0]).with_name("h"));
    let diff = faces.difference(ElementKind::Edge).unwrap();
    assert_eq!(diff.field().name(), Some("h_edge_face_difference"));
    let interior: Vec<f64> = diff.values().iter().copied().filter(|&v| v != 0.0).collect();
    assert_eq!(interior, vec![4.0]);

    let node_values = vec![0.0, 1.0, 3.0, 0.0, 1.0, 3.0];
    let nodes = MeshField::new(&mesh, DataField::from_vec("n_node", node_values));
    let diff = nodes.difference(ElementKind::Edge).unwrap();
    let mut values = diff.values().to_vec();
    values.sort_by(f64::total_cmp);
    assert_eq!(values, vec![0.0, 0.0, 0.0, 1.0, 1.0, 2.0, 2.0]);

    assert!(matches!(
        faces.difference(ElementKind::Node),
        Err(MeshError::UnsupportedCombination { .. })
    ));
    let edges = MeshField::new(&mesh, DataField::from_vec("n_edge", vec![0.0; 7]));
    assert!(matches!(
        edges.difference(ElementKind::Edge),
        Err(MeshError::UnsupportedCombination { from: ElementKind::Edge, .. })
    ));
}

#[test]
fn gradient_divides_by_center_distance() {
    let mesh = strip();
    let field = MeshField::new(&mesh, DataField::from_vec("n_face", vec![2.0, 6.0]).with_name("h"));
    let grad = field.gradient(GradientOptions::default()).unwrap();
    assert_eq!(grad.field().name(), Some("h_grad"));
    let xyz = mesh.xyz(ElementKind::Face);
    let d = ugrid_geo::geometry::coordinates::great_circle_angle(xyz[0], xyz[1]);
    let nonzero: Vec<f64> = grad.values().iter().copied().filter(|&v| v != 0.0).collect();
    assert_eq!(nonzero.len(), 1);
    assert_abs_diff_eq!(nonzero[0], 4.0 / d, epsilon = 1e-9);

    let normalized = field
        .gradient(GradientOptions {
            normalize: true,
            use_magnitude: false,
        })
        .unwrap();
    let norm: f64 = normalized.values().iter().map(|v| v * v).sum::<f64>().sqrt();
    assert_abs_diff_eq!(norm, 1.0, epsilon = 1e-12);

    let nodes = MeshField::new(&mesh, DataField::from_vec("n_node", vec![0.0; 6]));
    assert!(matches!(
        nodes.gradient(GradientOptions::default()),
        Err(MeshError::UnsupportedCentering { centering: ElementKind::Node, .. })
    ));
}

#[test]
fn integration_weights_by_face_area() {
    let mesh = lonlat_grid(4, 2, (0.0, 90.0), (0.0, 90.0));
    assert_abs_diff_eq!(mesh.total_face_area(), PI / 2.0, epsilon = 1e-9);

    let ones = DataField::new(
        vec!["time".into(), "n_face".into()],
        vec![2, mesh.n_face()],
        [vec![1.0; mesh.n_face()], vec![2.0; mesh.n_face()]].concat(),
    )
    .unwrap();
    let integral = MeshField::new(&mesh, ones).integrate().unwrap();
    assert_eq!(integral.shape(), &[2]);
    assert_abs_diff_eq!(integral.values()[0], PI / 2.0, epsilon = 1e-9);
    assert_abs_diff_eq!(integral.values()[1], PI, epsilon = 1e-9);

    let nodes = MeshField::new(&mesh, DataField::from_vec("n_node", vec![1.0; mesh.n_node()]));
    assert!(matches!(
        nodes.integrate(),
        Err(MeshError::UnsupportedCentering { centering: ElementKind::Node, .. })
    ));
    let odd = MeshField::new(&mesh, DataField::from_vec("x", vec![1.0; 1]));
    assert!(matches!(odd.integrate(), Err(MeshError::SizeMatchesNoKind { .. })));
}

#[test]
fn subsetting_carries_data() {
    let mesh = lonlat_grid(3, 2, (0.0, 30.0), (0.0, 20.0));
    let field = MeshField::new(&mesh, face_ramp(&mesh, 100.0));
    let sub = field.isel(ElementKind::Face, &[4, 1]).unwrap();
    assert_eq!(sub.indices.face_indices, vec![1, 4]);
    assert_eq!(sub.field.values(), &[101.0, 104.0]);
    assert_eq!(sub.mesh.n_face(), 2);
    assert_eq!(sub.as_mesh_field().centering(), Some(ElementKind::Face));

    let node_ids: Vec<f64> = (0..mesh.n_node()).map(|n| n as f64).collect();
    let nodes = MeshField::new(&mesh, DataField::from_vec("n_node", node_ids));
    let sub = nodes.isel(ElementKind::Node, &[0]).unwrap();
    assert_eq!(sub.indices.face_indices, vec![0]);
    assert_eq!(sub.field.values(), &[0.0, 1.0, 4.0, 5.0]);
}

proptest! {
    #[test]
    fn gradient_is_never_negative(
        values in prop::collection::vec(-1e6f64..1e6, 12),
        normalize in any::<bool>(),
    ) {
        let mesh = lonlat_grid(4, 3, (-40.0, 40.0), (-30.0, 30.0));
        let field = MeshField::new(&mesh, DataField::from_vec("n_face", values));
        let grad = field.gradient(GradientOptions { normalize, use_magnitude: true }).unwrap();
        prop_assert_eq!(grad.values().len(), mesh.n_edge());
        prop_assert!(grad.values().iter().all(|&g| g >= 0.0));
    }
}
