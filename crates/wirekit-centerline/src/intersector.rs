//! Medial-axis candidates from facet-normal line pairs
//!
//! Every facet defines a line through its centroid along its normal. For a
//! thin wire, lines from opposite sides of the surface pass close to each
//! other near the wire axis, so the midpoint of their closest approach is a
//! candidate centerline point.
//!
//! The search visits every unordered pair `(i, j)`, `i < j`. The outer
//! index is split into contiguous partitions that run on a [`WorkerPool`];
//! results are concatenated in partition order, which makes the output
//! identical to a sequential scan for any worker count.

use crate::pool::{partition, WorkerPool};
use nalgebra::{Point3, Vector3};
use std::ops::Range;
use tracing::{debug, warn};
use wirekit_core::{ConfigurationError, FacetSet, NumericDegeneracyError, Result};

/// Pairs whose centroids are farther apart than `max_distance` times this
/// are skipped before any line math.
pub const DEFAULT_COARSE_PRUNE_MULTIPLIER: f64 = 10.0;

/// Denominators smaller than this mark the two lines as near-parallel.
pub const PARALLEL_EPSILON: f64 = 1e-9;

/// Closest approach of two lines
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineApproach {
    /// Midpoint of the two closest points
    pub midpoint: Point3<f64>,
    /// Distance between the two closest points
    pub separation: f64,
}

/// Closest approach of the lines `p1 + t·v1` and `p2 + s·v2`
///
/// Returns `None` when the lines are near-parallel (or a direction is
/// zero), since the closest points are then undefined or unstable.
pub fn closest_point_between_lines(
    p1: &Point3<f64>,
    v1: &Vector3<f64>,
    p2: &Point3<f64>,
    v2: &Vector3<f64>,
) -> Option<LineApproach> {
    let n = v1.cross(v2);
    let n1 = v1.cross(&n);
    let n2 = v2.cross(&n);

    let denom1 = v1.dot(&n2);
    let denom2 = v2.dot(&n1);
    if denom1.abs() < PARALLEL_EPSILON || denom2.abs() < PARALLEL_EPSILON {
        return None;
    }

    let c1 = p1 + v1 * ((p2 - p1).dot(&n2) / denom1);
    let c2 = p2 + v2 * ((p1 - p2).dot(&n1) / denom2);

    Some(LineApproach {
        midpoint: nalgebra::center(&c1, &c2),
        separation: (c1 - c2).norm(),
    })
}

/// Output of one intersection search
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IntersectionReport {
    /// Accepted candidate points, in scan order
    pub candidates: Vec<Point3<f64>>,
    /// Pairs that passed the coarse prune and reached the line test
    pub tested_pairs: usize,
    /// Pairs skipped by the coarse prune
    pub pruned_pairs: usize,
    /// Pairs skipped as near-parallel
    pub degenerate_pairs: usize,
    /// Number of partitions the outer index was split into
    pub partitions: usize,
}

impl IntersectionReport {
    fn absorb(&mut self, other: IntersectionReport) {
        self.candidates.extend(other.candidates);
        self.tested_pairs += other.tested_pairs;
        self.pruned_pairs += other.pruned_pairs;
        self.degenerate_pairs += other.degenerate_pairs;
    }
}

/// Parallel pairwise facet-line intersection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairwiseAxisIntersector {
    max_distance: f64,
    coarse_prune_multiplier: f64,
}

impl PairwiseAxisIntersector {
    /// Create an intersector accepting pairs closer than `max_distance`
    ///
    /// Zero is allowed and accepts nothing.
    pub fn new(max_distance: f64) -> Result<Self> {
        if !max_distance.is_finite() {
            return Err(ConfigurationError::NonFinite {
                name: "max_distance".to_string(),
                value: max_distance,
            }
            .into());
        }
        if max_distance < 0.0 {
            return Err(ConfigurationError::Negative {
                name: "max_distance".to_string(),
                value: max_distance,
            }
            .into());
        }
        Ok(Self {
            max_distance,
            coarse_prune_multiplier: DEFAULT_COARSE_PRUNE_MULTIPLIER,
        })
    }

    /// Override the coarse-prune multiplier
    pub fn with_coarse_prune_multiplier(mut self, multiplier: f64) -> Result<Self> {
        if !(multiplier > 0.0) || !multiplier.is_finite() {
            return Err(
                ConfigurationError::non_positive("coarse_prune_multiplier", multiplier).into(),
            );
        }
        self.coarse_prune_multiplier = multiplier;
        Ok(self)
    }

    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    pub fn coarse_prune_multiplier(&self) -> f64 {
        self.coarse_prune_multiplier
    }

    /// Search every facet pair for candidate centerline points
    ///
    /// Fails if any facet is non-finite; the failure reported is the one
    /// from the lowest-indexed partition.
    pub fn intersect(&self, facets: &FacetSet, pool: &WorkerPool) -> Result<IntersectionReport> {
        let ranges = partition(facets.len(), pool.size());
        debug!(
            "Intersecting {} facets in {} partitions (max distance {:.6})",
            facets.len(),
            ranges.len(),
            self.max_distance
        );

        let partials = pool.scatter_gather(&ranges, |_, range| self.scan(range, facets));

        let mut report = IntersectionReport {
            partitions: ranges.len(),
            ..Default::default()
        };
        for partial in partials {
            report.absorb(partial?);
        }

        if report.degenerate_pairs > 0 {
            debug!(
                "Skipped {} near-parallel facet pairs",
                report.degenerate_pairs
            );
        }
        debug!(
            "Accepted {} candidates from {} tested pairs ({} pruned)",
            report.candidates.len(),
            report.tested_pairs,
            report.pruned_pairs
        );

        if report.candidates.is_empty() && report.degenerate_pairs > 0 {
            warn!("Every facet pair was rejected; near-parallel pairs emptied the candidate set");
            return Err(NumericDegeneracyError::EmptyCandidateSet {
                tested_pairs: report.tested_pairs,
                degenerate_pairs: report.degenerate_pairs,
            }
            .into());
        }

        Ok(report)
    }

    /// Scan all pairs whose first index lies in `range`
    fn scan(&self, range: Range<usize>, facets: &FacetSet) -> Result<IntersectionReport> {
        let centroids = facets.centroids();
        let normals = facets.normals();
        let prune_distance = self.max_distance * self.coarse_prune_multiplier;

        let mut report = IntersectionReport::default();

        for i in range {
            let (p1, v1) = (&centroids[i], &normals[i]);
            if !is_finite_point(p1) || !is_finite_vector(v1) {
                return Err(NumericDegeneracyError::NonFiniteFacet { index: i }.into());
            }

            for j in (i + 1)..centroids.len() {
                let (p2, v2) = (&centroids[j], &normals[j]);

                if (p1 - p2).norm() > prune_distance {
                    report.pruned_pairs += 1;
                    continue;
                }

                report.tested_pairs += 1;
                match closest_point_between_lines(p1, v1, p2, v2) {
                    Some(approach) if approach.separation < self.max_distance => {
                        report.candidates.push(approach.midpoint);
                    }
                    Some(_) => {}
                    None => report.degenerate_pairs += 1,
                }
            }
        }

        Ok(report)
    }
}

fn is_finite_point(p: &Point3<f64>) -> bool {
    p.iter().all(|c| c.is_finite())
}

fn is_finite_vector(v: &Vector3<f64>) -> bool {
    v.iter().all(|c| c.is_finite())
}
