use crate::fixtures::ringed_cylinder;
use wirekit_centerline::{CenterlinePipeline, PipelineConfig};
use wirekit_core::{FacetSet, MeshInput};

// Small fixtures need a wider acceptance band than the default so that
// facets within a ring survive the coarse prune.
fn pipeline() -> CenterlinePipeline {
    CenterlinePipeline::new(PipelineConfig {
        workers: Some(2),
        max_distance_fraction: 0.1,
        ..Default::default()
    })
    .unwrap()
}

#[test]
fn test_three_rings_are_too_few_for_a_spline() {
    let mesh = MeshInput::from_facets(ringed_cylinder(1.0, 4.0, 3, 6)).unwrap();
    let err = pipeline().run(&mesh).unwrap_err();
    assert!(err.is_insufficient_data(), "{}", err);
    assert!(err.to_string().contains("cubic"));
}

#[test]
fn test_single_ring_is_too_few_for_ordering() {
    let ring: Vec<usize> = (0..6).collect();
    let facets = ringed_cylinder(1.0, 4.0, 2, 6).select(&ring);
    let mesh = MeshInput::from_facets(facets).unwrap();
    let err = pipeline().run(&mesh).unwrap_err();
    assert!(err.is_insufficient_data(), "{}", err);
}

#[test]
fn test_empty_mesh_is_insufficient() {
    let mesh = MeshInput::new(FacetSet::default(), 1.0).unwrap();
    let err = pipeline().run(&mesh).unwrap_err();
    assert!(err.is_insufficient_data());
}

#[test]
fn test_all_parallel_normals_are_degenerate() {
    let facets = FacetSet::from_pairs((0..10).map(|i| {
        (
            wirekit_core::Point3::new(i as f64 * 0.1, 0.0, 0.0),
            wirekit_core::Vector3::z(),
        )
    }));
    let mesh = MeshInput::new(facets, 10.0).unwrap();
    let err = pipeline().run(&mesh).unwrap_err();
    assert!(err.is_numeric_degeneracy(), "{}", err);
}
