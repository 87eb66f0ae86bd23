use crate::fixtures::ringed_cylinder;
use wirekit_centerline::{
    CenterlinePipeline, MeshSampler, PairwiseAxisIntersector, PipelineConfig, WorkerPool,
};
use wirekit_core::MeshInput;

fn sampled_config(workers: usize) -> PipelineConfig {
    PipelineConfig {
        sample_size: 200,
        seed: 7,
        workers: Some(workers),
        ..Default::default()
    }
}

#[test]
fn test_same_seed_same_result() {
    let mesh = MeshInput::from_facets(ringed_cylinder(1.0, 100.0, 50, 8)).unwrap();
    let pipeline = CenterlinePipeline::new(sampled_config(2)).unwrap();

    let first = pipeline.run(&mesh).unwrap();
    let second = pipeline.run(&mesh).unwrap();

    assert_eq!(first.stats.sampled_facets, 200);
    assert_eq!(first.centerline, second.centerline);
    assert_eq!(first.curve, second.curve);
    assert_eq!(first.path, second.path);
}

#[test]
fn test_worker_count_does_not_change_candidates() {
    let facets = MeshSampler::new(150, 3)
        .unwrap()
        .sample(&ringed_cylinder(1.0, 40.0, 21, 12));
    let intersector = PairwiseAxisIntersector::new(0.5).unwrap();

    let single = intersector
        .intersect(&facets, &WorkerPool::new(1).unwrap())
        .unwrap();
    assert!(!single.candidates.is_empty());

    for workers in [2, 3, 4, 7] {
        let report = intersector
            .intersect(&facets, &WorkerPool::new(workers).unwrap())
            .unwrap();
        assert_eq!(report.candidates, single.candidates);
        assert_eq!(report.tested_pairs, single.tested_pairs);
        assert_eq!(report.degenerate_pairs, single.degenerate_pairs);
        assert_eq!(report.partitions, workers);
    }
}

#[test]
fn test_pipeline_output_independent_of_workers() {
    let mesh = MeshInput::from_facets(ringed_cylinder(1.0, 100.0, 50, 8)).unwrap();
    let one = CenterlinePipeline::new(sampled_config(1))
        .unwrap()
        .run(&mesh)
        .unwrap();
    let four = CenterlinePipeline::new(sampled_config(4))
        .unwrap()
        .run(&mesh)
        .unwrap();

    assert_eq!(one.centerline, four.centerline);
    assert_eq!(one.curve, four.curve);
    assert_eq!(one.stats.candidates, four.stats.candidates);
}
