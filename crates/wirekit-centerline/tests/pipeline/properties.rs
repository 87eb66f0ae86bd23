use proptest::prelude::*;
use wirekit_centerline::{dedup_points, PairwiseAxisIntersector, WorkerPool};
use wirekit_core::{FacetSet, Point3, Vector3};

fn coord() -> impl Strategy<Value = f64> {
    -1000.0f64..1000.0
}

fn point() -> impl Strategy<Value = Point3<f64>> {
    (coord(), coord(), coord()).prop_map(|(x, y, z)| Point3::new(x, y, z))
}

fn facet() -> impl Strategy<Value = (Point3<f64>, Vector3<f64>)> {
    let centroid = (-5.0f64..5.0, -5.0f64..5.0, -5.0f64..5.0)
        .prop_map(|(x, y, z)| Point3::new(x, y, z));
    let normal = (-1.0f64..1.0, -1.0f64..1.0, -1.0f64..1.0)
        .prop_filter("non-zero normal", |(x, y, z)| x * x + y * y + z * z > 1e-3)
        .prop_map(|(x, y, z)| Vector3::new(x, y, z).normalize());
    (centroid, normal)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn dedup_is_idempotent(points in prop::collection::vec(point(), 0..200)) {
        let once = dedup_points(&points);
        let twice = dedup_points(&once);
        prop_assert_eq!(&once, &twice);
        prop_assert!(once.len() <= points.len());
    }

    #[test]
    fn candidate_count_is_bounded_by_pair_count(
        pairs in prop::collection::vec(facet(), 0..40),
        max_distance in 0.0f64..3.0,
    ) {
        let facets = FacetSet::from_pairs(pairs);
        let n = facets.len();
        let pool = WorkerPool::new(3).unwrap();

        if let Ok(report) = PairwiseAxisIntersector::new(max_distance)
            .unwrap()
            .intersect(&facets, &pool)
        {
            prop_assert!(report.candidates.len() <= n * n.saturating_sub(1) / 2);
            prop_assert_eq!(
                report.tested_pairs + report.pruned_pairs,
                n * n.saturating_sub(1) / 2
            );
        }
    }

    #[test]
    fn zero_max_distance_accepts_nothing(pairs in prop::collection::vec(facet(), 0..40)) {
        let facets = FacetSet::from_pairs(pairs);
        let pool = WorkerPool::new(2).unwrap();

        match PairwiseAxisIntersector::new(0.0).unwrap().intersect(&facets, &pool) {
            Ok(report) => prop_assert!(report.candidates.is_empty()),
            Err(err) => prop_assert!(err.is_numeric_degeneracy()),
        }
    }

    #[test]
    fn parallel_normals_never_yield_candidates(
        centroids in prop::collection::vec((-5.0f64..5.0, -5.0f64..5.0, -5.0f64..5.0), 2..30),
        flip in prop::collection::vec(any::<bool>(), 30),
    ) {
        let direction = Vector3::new(0.3, -0.4, 0.866).normalize();
        let facets = FacetSet::from_pairs(centroids.iter().enumerate().map(|(i, &(x, y, z))| {
            let normal = if flip[i] { -direction } else { direction };
            (Point3::new(x, y, z), normal)
        }));
        let pool = WorkerPool::new(2).unwrap();

        match PairwiseAxisIntersector::new(1.0).unwrap().intersect(&facets, &pool) {
            Ok(report) => prop_assert!(report.candidates.is_empty()),
            Err(err) => prop_assert!(err.is_numeric_degeneracy()),
        }
    }
}
