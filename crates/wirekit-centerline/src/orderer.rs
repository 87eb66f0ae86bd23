//! Candidate cloud to ordered centerline
//!
//! Candidates are deduplicated on a fixed absolute grid, projected onto the
//! dominant principal axis of the cloud and sorted by that projection. The
//! ordering cannot follow a wire that doubles back along its dominant axis.

use nalgebra::{Matrix3, Point3, SymmetricEigen, Vector3};
use std::collections::HashSet;
use tracing::debug;
use wirekit_core::{InsufficientDataError, Result};

/// Absolute rounding step used to merge near-identical candidates
pub const DEDUP_PRECISION: f64 = 1e-5;

/// Minimum number of distinct points needed to define an axis
pub const MIN_CENTERLINE_POINTS: usize = 2;

/// Centerline points sorted along the dominant axis
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedCenterline {
    pub points: Vec<Point3<f64>>,
    /// Unit principal axis the points were sorted along
    pub axis: Vector3<f64>,
    /// Median spacing between consecutive points
    pub wire_diameter: f64,
}

impl OrderedCenterline {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Projections of the points onto the axis, relative to the first point
    pub fn projections(&self) -> Vec<f64> {
        let Some(origin) = self.points.first() else {
            return Vec::new();
        };
        self.points
            .iter()
            .map(|p| (p - origin).dot(&self.axis))
            .collect()
    }
}

/// Grid cell of one coordinate, in units of [`DEDUP_PRECISION`]
///
/// Kept as a float so large coordinates do not saturate an integer; adding
/// zero folds `-0.0` into `0.0`.
fn grid_cell(value: f64) -> f64 {
    (value / DEDUP_PRECISION).round() + 0.0
}

/// Round every point to [`DEDUP_PRECISION`] and keep one per grid cell
///
/// The rounded point is the representative, and first occurrence decides
/// the output order. Applying this twice gives the same result as once.
pub fn dedup_points(points: &[Point3<f64>]) -> Vec<Point3<f64>> {
    let mut seen = HashSet::with_capacity(points.len());
    let mut unique = Vec::new();

    for p in points {
        let cell = [grid_cell(p.x), grid_cell(p.y), grid_cell(p.z)];
        if seen.insert(cell.map(f64::to_bits)) {
            unique.push(Point3::new(
                cell[0] * DEDUP_PRECISION,
                cell[1] * DEDUP_PRECISION,
                cell[2] * DEDUP_PRECISION,
            ));
        }
    }

    unique
}

/// First principal component of the centered point set
///
/// The sign is fixed so the largest-magnitude component is positive.
/// Returns `None` for fewer than two points.
pub fn principal_axis(points: &[Point3<f64>]) -> Option<Vector3<f64>> {
    if points.len() < 2 {
        return None;
    }

    let n = points.len() as f64;
    let mean = points.iter().fold(Vector3::zeros(), |acc, p| acc + p.coords) / n;

    let covariance = points.iter().fold(Matrix3::zeros(), |acc, p| {
        let d = p.coords - mean;
        acc + d * d.transpose()
    }) / n;

    let eigen = SymmetricEigen::new(covariance);
    let dominant = eigen.eigenvalues.imax();
    let mut axis: Vector3<f64> = eigen.eigenvectors.column(dominant).into_owned();

    let norm = axis.norm();
    if !(norm > 0.0) || !norm.is_finite() {
        return None;
    }
    axis /= norm;

    if axis[axis.iamax()] < 0.0 {
        axis = -axis;
    }
    Some(axis)
}

/// Median of a list of values, `None` when empty
///
/// Even-length input averages the two middle values.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Deduplicates, orders and measures a candidate cloud
#[derive(Debug, Clone, Copy, Default)]
pub struct PointCloudOrderer;

impl PointCloudOrderer {
    pub fn new() -> Self {
        Self
    }

    pub fn order(&self, candidates: &[Point3<f64>]) -> Result<OrderedCenterline> {
        let unique = dedup_points(candidates);
        debug!(
            "Deduplicated {} candidates to {} points",
            candidates.len(),
            unique.len()
        );

        if unique.len() < MIN_CENTERLINE_POINTS {
            return Err(InsufficientDataError::CenterlinePoints {
                required: MIN_CENTERLINE_POINTS,
                found: unique.len(),
            }
            .into());
        }

        // Distinct points always have a non-zero covariance.
        let axis = principal_axis(&unique).unwrap_or_else(Vector3::x);

        let mut keyed: Vec<(f64, Point3<f64>)> =
            unique.into_iter().map(|p| (p.coords.dot(&axis), p)).collect();
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
        let points: Vec<Point3<f64>> = keyed.into_iter().map(|(_, p)| p).collect();

        let spacings: Vec<f64> = points.windows(2).map(|w| (w[1] - w[0]).norm()).collect();
        let wire_diameter = median(&spacings).unwrap_or(0.0);

        debug!(
            "Ordered {} points along axis ({:.4}, {:.4}, {:.4}), wire diameter {:.4}",
            points.len(),
            axis.x,
            axis.y,
            axis.z,
            wire_diameter
        );

        Ok(OrderedCenterline {
            points,
            axis,
            wire_diameter,
        })
    }
}
