//! Error-bounded spline smoothing
//!
//! Fits a natural cubic smoothing spline to each coordinate of the ordered
//! centerline, sharing one chord-length parametrization over `[0, 1]` and
//! one smoothing weight `α`. For a given `α` the spline minimizes
//!
//! ```text
//! Σ |p_i − g(u_i)|² + α ∫ |g''(u)|² du
//! ```
//!
//! and the residual grows monotonically with `α`. The weight is chosen by
//! bisection so the residual sum of squares stays within the tolerance
//! `(max_error_percent / 100 × wire_diameter)²`.
//!
//! The linear system follows the Reinsch formulation: with `Q` the
//! second-difference operator (n × n−2) and `R` the tridiagonal knot-spacing
//! matrix, the interior second derivatives `γ` solve
//! `(R + α QᵀQ) γ = Qᵀ y` and the fitted values are `g = y − α Q γ`.
//! `R + α QᵀQ` is symmetric positive definite with bandwidth two, so a
//! banded Cholesky factorization solves it in linear time.

use nalgebra::Point3;
use tracing::{debug, warn};
use wirekit_core::{
    ConfigurationError, InsufficientDataError, NumericDegeneracyError, Result,
};

/// Default smoothing budget, as a percentage of the wire diameter
pub const DEFAULT_MAX_ERROR_PERCENT: f64 = 5.0;

/// A cubic fit needs at least four control points
pub const MIN_SPLINE_POINTS: usize = 4;

/// Knot spacings (on the normalized parameter) below this are coincident
const MIN_KNOT_SPACING: f64 = 1e-12;

/// Search range for `α`, in decades around the natural scale `h̄³`
const WEIGHT_DECADES: i32 = 10;

const BISECTION_STEPS: usize = 64;

/// Sum-of-squared-residuals budget for a given error percentage
pub fn smoothing_tolerance(max_error_percent: f64, wire_diameter: f64) -> f64 {
    let max_error = max_error_percent / 100.0 * wire_diameter;
    max_error * max_error
}

/// Evenly resampled smoothing spline
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothedCurve {
    /// `2 × input` samples, grouped as cubic Bezier runs by the emitter
    pub points: Vec<Point3<f64>>,
    /// `(points − 1) / 3`, truncating
    pub number_of_curves: usize,
    /// Smoothing weight `α` that was selected
    pub smoothing_weight: f64,
    /// Sum of squared residuals at the input points
    pub residual: f64,
    /// Residual budget the weight was chosen against
    pub tolerance: f64,
}

impl SmoothedCurve {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Number of cubic segments a run of `point_count` samples yields
///
/// Integer division: one or two trailing samples do not form a segment.
pub fn curve_count(point_count: usize) -> usize {
    point_count.saturating_sub(1) / 3
}

/// Fits and resamples a smoothing spline through ordered points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplineSmoother {
    max_error_percent: f64,
}

impl SplineSmoother {
    pub fn new(max_error_percent: f64) -> Result<Self> {
        if !(max_error_percent > 0.0) || !max_error_percent.is_finite() {
            return Err(
                ConfigurationError::non_positive("max_error_percent", max_error_percent).into(),
            );
        }
        Ok(Self { max_error_percent })
    }

    pub fn max_error_percent(&self) -> f64 {
        self.max_error_percent
    }

    pub fn smooth(&self, points: &[Point3<f64>], wire_diameter: f64) -> Result<SmoothedCurve> {
        if points.len() < MIN_SPLINE_POINTS {
            return Err(InsufficientDataError::SplinePoints {
                required: MIN_SPLINE_POINTS,
                found: points.len(),
            }
            .into());
        }
        if !wire_diameter.is_finite() || wire_diameter < 0.0 {
            return Err(degenerate(format!(
                "wire diameter {} is not a finite length",
                wire_diameter
            )));
        }

        let system = SmoothingSystem::new(points)?;
        let tolerance = smoothing_tolerance(self.max_error_percent, wire_diameter);
        let fit = system.fit_within(tolerance)?;

        debug!(
            "Smoothing weight {:.3e}: residual {:.3e} within tolerance {:.3e}",
            fit.weight, fit.residual, tolerance
        );

        let sample_count = 2 * points.len();
        let samples = system.resample(&fit, sample_count);
        let number_of_curves = curve_count(samples.len());

        debug!(
            "Resampled spline at {} points ({} cubic segments)",
            samples.len(),
            number_of_curves
        );

        Ok(SmoothedCurve {
            points: samples,
            number_of_curves,
            smoothing_weight: fit.weight,
            residual: fit.residual,
            tolerance,
        })
    }
}

fn degenerate(reason: impl Into<String>) -> wirekit_core::Error {
    NumericDegeneracyError::SplineParametrization {
        reason: reason.into(),
    }
    .into()
}

/// Spline values and interior second derivatives for one weight
struct Fit {
    weight: f64,
    /// Fitted values at the knots, per coordinate
    values: [Vec<f64>; 3],
    /// Interior second derivatives, per coordinate
    gamma: [Vec<f64>; 3],
    residual: f64,
}

/// Precomputed band matrices for one parametrization
struct SmoothingSystem {
    knots: Vec<f64>,
    spacing: Vec<f64>,
    /// Data, per coordinate
    y: [Vec<f64>; 3],
    /// Column `c` of `Q` has entries at rows `c`, `c+1`, `c+2`
    q: Vec<[f64; 3]>,
    r_diag: Vec<f64>,
    r_off: Vec<f64>,
    qtq: Band,
    qty: [Vec<f64>; 3],
}

/// Symmetric matrix with bandwidth two
#[derive(Clone)]
struct Band {
    diag: Vec<f64>,
    off1: Vec<f64>,
    off2: Vec<f64>,
}

impl SmoothingSystem {
    fn new(points: &[Point3<f64>]) -> Result<Self> {
        if points
            .iter()
            .any(|p| !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()))
        {
            return Err(degenerate("non-finite point in ordered centerline"));
        }

        let chords: Vec<f64> = points.windows(2).map(|w| (w[1] - w[0]).norm()).collect();
        let total: f64 = chords.iter().sum();
        if !(total > 0.0) || !total.is_finite() {
            return Err(degenerate("ordered centerline has zero length"));
        }

        let n = points.len();
        let mut knots = Vec::with_capacity(n);
        let mut acc = 0.0;
        knots.push(0.0);
        for chord in &chords {
            acc += chord;
            knots.push(acc / total);
        }
        knots[n - 1] = 1.0;

        let spacing: Vec<f64> = knots.windows(2).map(|w| w[1] - w[0]).collect();
        if let Some(i) = spacing.iter().position(|&h| h <= MIN_KNOT_SPACING) {
            return Err(degenerate(format!(
                "points {} and {} coincide",
                i,
                i + 1
            )));
        }

        let y = [
            points.iter().map(|p| p.x).collect::<Vec<_>>(),
            points.iter().map(|p| p.y).collect::<Vec<_>>(),
            points.iter().map(|p| p.z).collect::<Vec<_>>(),
        ];

        let m = n - 2;
        let q: Vec<[f64; 3]> = (0..m)
            .map(|c| {
                let a = 1.0 / spacing[c];
                let b = 1.0 / spacing[c + 1];
                [a, -a - b, b]
            })
            .collect();

        let r_diag = (0..m).map(|c| (spacing[c] + spacing[c + 1]) / 3.0).collect();
        let r_off = (0..m.saturating_sub(1))
            .map(|c| spacing[c + 1] / 6.0)
            .collect();

        let qtq = Band {
            diag: q.iter().map(|col| col.iter().map(|v| v * v).sum()).collect(),
            off1: (0..m.saturating_sub(1))
                .map(|c| q[c][1] * q[c + 1][0] + q[c][2] * q[c + 1][1])
                .collect(),
            off2: (0..m.saturating_sub(2))
                .map(|c| q[c][2] * q[c + 2][0])
                .collect(),
        };

        let qty = [0, 1, 2].map(|axis| {
            q.iter()
                .enumerate()
                .map(|(c, col)| {
                    col[0] * y[axis][c] + col[1] * y[axis][c + 1] + col[2] * y[axis][c + 2]
                })
                .collect::<Vec<f64>>()
        });

        Ok(Self {
            knots,
            spacing,
            y,
            q,
            r_diag,
            r_off,
            qtq,
            qty,
        })
    }

    fn interior_len(&self) -> usize {
        self.q.len()
    }

    /// Solve the smoothing system for a fixed weight
    fn fit(&self, weight: f64) -> Result<Fit> {
        let m = self.interior_len();
        let matrix = Band {
            diag: (0..m)
                .map(|c| self.r_diag[c] + weight * self.qtq.diag[c])
                .collect(),
            off1: (0..m.saturating_sub(1))
                .map(|c| self.r_off[c] + weight * self.qtq.off1[c])
                .collect(),
            off2: self.qtq.off2.iter().map(|v| weight * v).collect(),
        };
        let factor = BandedCholesky::factor(&matrix)
            .ok_or_else(|| degenerate("smoothing system is not positive definite"))?;

        let n = self.knots.len();
        let mut residual = 0.0;
        let mut values: [Vec<f64>; 3] = Default::default();
        let mut gamma: [Vec<f64>; 3] = Default::default();

        for axis in 0..3 {
            let g = factor.solve(&self.qty[axis]);

            let mut q_gamma = vec![0.0; n];
            for (c, col) in self.q.iter().enumerate() {
                q_gamma[c] += col[0] * g[c];
                q_gamma[c + 1] += col[1] * g[c];
                q_gamma[c + 2] += col[2] * g[c];
            }

            values[axis] = self.y[axis]
                .iter()
                .zip(&q_gamma)
                .map(|(y, qg)| y - weight * qg)
                .collect();
            residual += q_gamma.iter().map(|qg| (weight * qg).powi(2)).sum::<f64>();
            gamma[axis] = g;
        }

        if !residual.is_finite() {
            return Err(degenerate("smoothing residual is not finite"));
        }

        Ok(Fit {
            weight,
            values,
            gamma,
            residual,
        })
    }

    /// Largest-weight fit whose residual stays within `tolerance`
    ///
    /// A weight whose system cannot be factored counts as infeasible. The
    /// interpolant (`α = 0`) only involves `R`, which is diagonally dominant.
    fn fit_within(&self, tolerance: f64) -> Result<Fit> {
        let interpolant = self.fit(0.0)?;
        if !(tolerance > 0.0) {
            return Ok(interpolant);
        }

        let mean_spacing = 1.0 / self.spacing.len() as f64;
        let scale = mean_spacing.powi(3);
        let floor = scale * 10f64.powi(-WEIGHT_DECADES);
        let ceiling = scale * 10f64.powi(WEIGHT_DECADES);

        if let Some(stiffest) = self.feasible_fit(ceiling, tolerance) {
            return Ok(stiffest);
        }

        let Some(mut feasible) = self.feasible_fit(floor, tolerance) else {
            warn!(
                "No smoothing weight keeps the residual within {:.3e}; interpolating",
                tolerance
            );
            return Ok(interpolant);
        };

        let mut lo = floor.ln();
        let mut hi = ceiling.ln();
        for _ in 0..BISECTION_STEPS {
            let mid = 0.5 * (lo + hi);
            match self.feasible_fit(mid.exp(), tolerance) {
                Some(candidate) => {
                    lo = mid;
                    feasible = candidate;
                }
                None => hi = mid,
            }
        }

        Ok(feasible)
    }

    fn feasible_fit(&self, weight: f64, tolerance: f64) -> Option<Fit> {
        match self.fit(weight) {
            Ok(fit) if fit.residual <= tolerance => Some(fit),
            Ok(_) => None,
            Err(e) => {
                debug!("Smoothing weight {:.3e} rejected: {}", weight, e);
                None
            }
        }
    }

    /// Evaluate the fitted spline at `count` evenly spaced parameters
    fn resample(&self, fit: &Fit, count: usize) -> Vec<Point3<f64>> {
        let n = self.knots.len();
        let second = |axis: usize, k: usize| -> f64 {
            if k == 0 || k == n - 1 {
                0.0
            } else {
                fit.gamma[axis][k - 1]
            }
        };

        let mut samples = Vec::with_capacity(count);
        let mut interval = 0;
        for s in 0..count {
            let t = if count > 1 {
                s as f64 / (count - 1) as f64
            } else {
                0.0
            };
            while interval < n - 2 && t > self.knots[interval + 1] {
                interval += 1;
            }

            let i = interval;
            let h = self.spacing[i];
            let d = t - self.knots[i];
            let e = self.knots[i + 1] - t;

            let mut coords = [0.0; 3];
            for (axis, coord) in coords.iter_mut().enumerate() {
                let g0 = fit.values[axis][i];
                let g1 = fit.values[axis][i + 1];
                let linear = (d * g1 + e * g0) / h;
                let bend = d * e / 6.0
                    * ((1.0 + d / h) * second(axis, i + 1) + (1.0 + e / h) * second(axis, i));
                *coord = linear - bend;
            }
            samples.push(Point3::new(coords[0], coords[1], coords[2]));
        }
        samples
    }
}

/// Cholesky factor `L` of a bandwidth-two SPD matrix
struct BandedCholesky {
    l0: Vec<f64>,
    l1: Vec<f64>,
    l2: Vec<f64>,
}

impl BandedCholesky {
    fn factor(a: &Band) -> Option<Self> {
        let m = a.diag.len();
        let mut l0 = vec![0.0; m];
        let mut l1 = vec![0.0; m];
        let mut l2 = vec![0.0; m];

        for i in 0..m {
            if i >= 2 {
                l2[i] = a.off2[i - 2] / l0[i - 2];
            }
            if i >= 1 {
                l1[i] = (a.off1[i - 1] - l2[i] * l1[i - 1]) / l0[i - 1];
            }
            let pivot = a.diag[i] - l1[i] * l1[i] - l2[i] * l2[i];
            if !(pivot > 0.0) || !pivot.is_finite() {
                return None;
            }
            l0[i] = pivot.sqrt();
        }

        Some(Self { l0, l1, l2 })
    }

    fn solve(&self, b: &[f64]) -> Vec<f64> {
        let m = self.l0.len();

        let mut z = vec![0.0; m];
        for i in 0..m {
            let mut v = b[i];
            if i >= 1 {
                v -= self.l1[i] * z[i - 1];
            }
            if i >= 2 {
                v -= self.l2[i] * z[i - 2];
            }
            z[i] = v / self.l0[i];
        }

        let mut x = vec![0.0; m];
        for i in (0..m).rev() {
            let mut v = z[i];
            if i + 1 < m {
                v -= self.l1[i + 1] * x[i + 1];
            }
            if i + 2 < m {
                v -= self.l2[i + 2] * x[i + 2];
            }
            x[i] = v / self.l0[i];
        }
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn wavy(n: usize, amplitude: f64) -> Vec<Point3<f64>> {
        (0..n)
            .map(|i| {
                let x = i as f64;
                let wobble = if i % 2 == 0 { amplitude } else { -amplitude };
                Point3::new(x, (x * 0.2).sin() * 5.0 + wobble, 0.0)
            })
            .collect()
    }

    #[test]
    fn test_tolerance_formula() {
        assert_relative_eq!(smoothing_tolerance(5.0, 2.0), 0.01, epsilon = 1e-15);
        assert_eq!(smoothing_tolerance(5.0, 0.0), 0.0);
    }

    #[test]
    fn test_curve_count_truncates() {
        assert_eq!(curve_count(0), 0);
        assert_eq!(curve_count(1), 0);
        assert_eq!(curve_count(4), 1);
        assert_eq!(curve_count(7), 2);
        assert_eq!(curve_count(8), 2);
        assert_eq!(curve_count(9), 2);
        assert_eq!(curve_count(10), 3);
    }

    #[test]
    fn test_invalid_error_percent() {
        assert!(SplineSmoother::new(0.0).unwrap_err().is_configuration_error());
        assert!(SplineSmoother::new(-3.0).is_err());
        assert!(SplineSmoother::new(f64::NAN).is_err());
    }

    #[test]
    fn test_fewer_than_four_points() {
        let smoother = SplineSmoother::new(5.0).unwrap();
        let err = smoother.smooth(&wavy(3, 0.0), 1.0).unwrap_err();
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn test_coincident_points_are_degenerate() {
        let smoother = SplineSmoother::new(5.0).unwrap();
        let mut points = wavy(6, 0.0);
        points[3] = points[2];
        let err = smoother.smooth(&points, 1.0).unwrap_err();
        assert!(err.is_numeric_degeneracy());

        let same = vec![Point3::new(1.0, 1.0, 1.0); 5];
        let err = smoother.smooth(&same, 1.0).unwrap_err();
        assert!(err.is_numeric_degeneracy());
    }

    #[test]
    fn test_output_length_is_twice_input() {
        let smoother = SplineSmoother::new(5.0).unwrap();
        let curve = smoother.smooth(&wavy(11, 0.1), 1.0).unwrap();
        assert_eq!(curve.len(), 22);
        assert_eq!(curve.number_of_curves, 7);
    }

    #[test]
    fn test_zero_tolerance_interpolates() {
        let points = wavy(7, 0.3);
        let smoother = SplineSmoother::new(5.0).unwrap();
        let curve = smoother.smooth(&points, 0.0).unwrap();

        assert_eq!(curve.smoothing_weight, 0.0);
        assert_relative_eq!(curve.residual, 0.0, epsilon = 1e-20);
        assert_relative_eq!(curve.points[0], points[0], epsilon = 1e-9);
        assert_relative_eq!(curve.points[13], points[6], epsilon = 1e-9);
    }

    #[test]
    fn test_straight_line_is_preserved() {
        let points: Vec<_> = (0..10)
            .map(|i| Point3::new(0.0, 0.0, i as f64 * 2.0))
            .collect();
        let smoother = SplineSmoother::new(5.0).unwrap();
        let curve = smoother.smooth(&points, 2.0).unwrap();

        for p in &curve.points {
            assert_relative_eq!(p.x, 0.0, epsilon = 1e-6);
            assert_relative_eq!(p.y, 0.0, epsilon = 1e-6);
        }
        assert_relative_eq!(curve.points[0].z, 0.0, epsilon = 1e-6);
        assert_relative_eq!(curve.points[19].z, 18.0, epsilon = 1e-6);
        let zs: Vec<f64> = curve.points.iter().map(|p| p.z).collect();
        assert!(zs.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_residual_respects_tolerance_and_grows_with_it() {
        let points = wavy(30, 0.4);
        let mut last_residual = 0.0;
        let mut last_curves = usize::MAX;

        for percent in [1.0, 5.0, 20.0, 80.0] {
            let curve = SplineSmoother::new(percent)
                .unwrap()
                .smooth(&points, 1.0)
                .unwrap();
            assert!(curve.residual <= curve.tolerance);
            assert!(curve.residual + 1e-12 >= last_residual);
            assert!(curve.number_of_curves <= last_curves);
            last_residual = curve.residual;
            last_curves = curve.number_of_curves;
        }
    }

    #[test]
    fn test_smoothing_reduces_wobble() {
        let points = wavy(40, 0.5);
        let curve = SplineSmoother::new(100.0)
            .unwrap()
            .smooth(&points, 2.0)
            .unwrap();
        assert!(curve.smoothing_weight > 0.0);
        assert!(curve.residual > 0.0);
    }

    #[test]
    fn test_banded_cholesky_solves_pentadiagonal_system() {
        // 4x4 SPD: diag 6, off1 -4, off2 1 (squared second-difference shape
        // plus identity)
        let band = Band {
            diag: vec![6.0; 4],
            off1: vec![-4.0; 3],
            off2: vec![1.0; 2],
        };
        let factor = BandedCholesky::factor(&band).unwrap();
        let x_true = [1.0, -2.0, 0.5, 3.0];

        let b: Vec<f64> = (0..4)
            .map(|i| {
                let mut v = band.diag[i] * x_true[i];
                if i >= 1 {
                    v += band.off1[i - 1] * x_true[i - 1];
                }
                if i + 1 < 4 {
                    v += band.off1[i] * x_true[i + 1];
                }
                if i >= 2 {
                    v += band.off2[i - 2] * x_true[i - 2];
                }
                if i + 2 < 4 {
                    v += band.off2[i] * x_true[i + 2];
                }
                v
            })
            .collect();

        let x = factor.solve(&b);
        for (got, want) in x.iter().zip(x_true) {
            assert_relative_eq!(*got, want, epsilon = 1e-10);
        }
    }
}
