mod util;

use proptest::prelude::*;
use ugrid_geo::algs::remap::nearest_neighbor;
use ugrid_geo::prelude::*;
use util::{global_band, lonlat_grid, random_lonlat};

fn stacked(mesh: &Mesh, kind: ElementKind, leading: &[usize]) -> DataField<f64> {
    let n = mesh.count(kind);
    let rows: usize = leading.iter().product();
    let mut dims: Vec<String> = (0..leading.len()).map(|i| format!("d{i}")).collect();
    dims.push(kind.dim_name().to_string());
    let mut shape = leading.to_vec();
    shape.push(n);
    DataField::new(dims, shape, (0..rows * n).map(|v| v as f64).collect()).unwrap()
}

#[test]
fn identity_on_face_centers() {
    let mesh = lonlat_grid(6, 4, (-30.0, 30.0), (-20.0, 20.0));
    let data = stacked(&mesh, ElementKind::Face, &[3]);
    for coord_type in [CoordSystem::Spherical, CoordSystem::Cartesian] {
        let out = MeshField::new(&mesh, data.clone())
            .remap_nearest_neighbor(
                &mesh,
                RemapOptions {
                    remap_to: ElementKind::Face,
                    coord_type,
                },
            )
            .unwrap();
        assert_eq!(out.field().values(), data.values());
        assert_eq!(out.field().shape(), data.shape());
    }
}

#[test]
fn seam_neighbors_are_found_across_the_antimeridian() {
    let source = global_band(36, (-5.0, 5.0));
    let data = DataField::from_vec("n_face", (0..source.n_face()).map(|f| f as f64).collect());
    // A single face hugging the seam from the west.
    let dest = Mesh::from_faces(
        vec![-179.9, -179.5, -179.5, -179.9],
        vec![-1.0, -1.0, 1.0, 1.0],
        &[vec![0, 1, 2, 3]],
    )
    .unwrap();
    let out = nearest_neighbor(&source, &dest, &data, RemapOptions::default()).unwrap();
    // Face 35 spans 175°E..175°W.
    assert_eq!(out.values(), &[35.0]);
}

#[test]
fn one_dimensional_input_stays_one_dimensional() {
    let src = lonlat_grid(4, 4, (0.0, 40.0), (0.0, 40.0));
    let dst = lonlat_grid(3, 3, (5.0, 35.0), (5.0, 35.0));
    let data = DataField::from_vec("n_node", vec![1.5; src.n_node()]);
    let options = RemapOptions::parse("edge centers", "spherical").unwrap();
    let out = nearest_neighbor(&src, &dst, &data, options).unwrap();
    assert_eq!(out.shape(), &[dst.n_edge()]);
    assert_eq!(out.dims(), &["n_edge".to_string()]);
    assert!(out.values().iter().all(|&v| v == 1.5));
}

#[test]
fn unanchored_data_is_rejected_before_indexing() {
    let src = lonlat_grid(2, 2, (0.0, 20.0), (0.0, 20.0));
    // 9 nodes, 12 edges, 4 faces.
    let data = DataField::from_vec("x", vec![0.0; 7]);
    let err = nearest_neighbor(&src, &src, &data, RemapOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        MeshError::UnanchoredData { n_node: 9, n_edge: 12, n_face: 4, .. }
    ));
    assert!(matches!(
        RemapOptions::parse("corners", "spherical"),
        Err(MeshError::InvalidArgument { .. })
    ));
}

#[test]
fn spherical_and_cartesian_agree() {
    let src = lonlat_grid(12, 8, (-60.0, 60.0), (-40.0, 40.0));
    let (lon, lat) = random_lonlat(200, 7);
    let lon: Vec<f64> = lon.into_iter().map(|x| x / 3.0).collect();
    let lat: Vec<f64> = lat.into_iter().map(|y| y / 2.0).collect();
    // Destination triangles around each random point; remap onto nodes.
    let faces: Vec<Vec<usize>> = (0..lon.len() / 3)
        .map(|i| vec![3 * i, 3 * i + 1, 3 * i + 2])
        .collect();
    let dst = Mesh::from_faces(lon, lat, &faces).unwrap();

    for kind in ElementKind::ALL {
        let data = stacked(&src, kind, &[]);
        let remap = |coord_type| {
            nearest_neighbor(
                &src,
                &dst,
                &data,
                RemapOptions {
                    remap_to: ElementKind::Node,
                    coord_type,
                },
            )
            .unwrap()
        };
        assert_eq!(
            remap(CoordSystem::Spherical).values(),
            remap(CoordSystem::Cartesian).values(),
            "disagreement for {kind}-centered data"
        );
    }
}

#[test]
fn spatial_indices_are_reused() {
    let src = lonlat_grid(3, 3, (0.0, 30.0), (0.0, 30.0));
    let data = DataField::from_vec("n_face", vec![0.0; src.n_face()]);
    nearest_neighbor(&src, &src, &data, RemapOptions::default()).unwrap();
    let a = src.spherical_ball_tree(ElementKind::Face, false, true).unwrap();
    let b = src.spherical_ball_tree(ElementKind::Face, false, true).unwrap();
    assert!(std::rc::Rc::ptr_eq(&a, &b));
    assert_eq!(a.len(), src.n_face());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn shape_contract(
        source_kind in prop::sample::select(ElementKind::ALL.to_vec()),
        target in prop::sample::select(ElementKind::ALL.to_vec()),
        cartesian in any::<bool>(),
        leading in prop::collection::vec(1usize..4, 0..3),
    ) {
        let src = lonlat_grid(5, 3, (10.0, 60.0), (-15.0, 15.0));
        let dst = lonlat_grid(2, 4, (0.0, 70.0), (-20.0, 20.0));
        let data = stacked(&src, source_kind, &leading);
        let coord_type = if cartesian { CoordSystem::Cartesian } else { CoordSystem::Spherical };
        let options = RemapOptions { remap_to: target, coord_type };
        let out = nearest_neighbor(&src, &dst, &data, options).unwrap();
        let mut expected = leading.clone();
        expected.push(dst.count(target));
        prop_assert_eq!(out.shape(), expected.as_slice());
        prop_assert_eq!(out.trailing_dim(), Some(target.dim_name()));
    }
}
