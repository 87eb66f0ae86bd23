//! Flattening the smoothed curve to a 2D cubic Bezier path

use nalgebra::{Point2, Point3};
use tracing::debug;
use wirekit_core::{
    AxisSelection, Bounds3, ConfigurationError, InsufficientDataError, PlaneAxes, Result,
};

/// Fraction of the larger drawing extent added as a margin on every side
pub const PADDING_FRACTION: f64 = 0.1;

/// One drawing command, in document coordinates (millimeters)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point2<f64>),
    CurveTo {
        control1: Point2<f64>,
        control2: Point2<f64>,
        end: Point2<f64>,
    },
}

/// Flattened, scaled and padded curve ready for a document writer
#[derive(Debug, Clone, PartialEq)]
pub struct EmittedPath {
    /// Every projected sample, including any the commands leave out
    pub points: Vec<Point2<f64>>,
    pub commands: Vec<PathCommand>,
    /// Scaled extent of the curve, without padding
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub plane: PlaneAxes,
    pub stroke_width: f64,
}

impl EmittedPath {
    pub fn document_width(&self) -> f64 {
        self.width + 2.0 * self.padding
    }

    pub fn document_height(&self) -> f64 {
        self.height + 2.0 * self.padding
    }

    /// Number of cubic segments in the path
    pub fn curve_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, PathCommand::CurveTo { .. }))
            .count()
    }

    /// SVG path data (`M x,y C x1,y1 x2,y2 x,y …`) with `precision` decimals
    pub fn path_data(&self, precision: usize) -> String {
        let mut d = String::new();
        for command in &self.commands {
            if !d.is_empty() {
                d.push(' ');
            }
            let segment = match command {
                PathCommand::MoveTo(p) => {
                    format!("M {:.*},{:.*}", precision, p.x, precision, p.y)
                }
                PathCommand::CurveTo {
                    control1,
                    control2,
                    end,
                } => format!(
                    "C {:.*},{:.*} {:.*},{:.*} {:.*},{:.*}",
                    precision,
                    control1.x,
                    precision,
                    control1.y,
                    precision,
                    control2.x,
                    precision,
                    control2.y,
                    precision,
                    end.x,
                    precision,
                    end.y
                ),
            };
            d.push_str(&segment);
        }
        d
    }
}

/// Projects a 3D curve onto a plane and groups it into cubic segments
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveEmitter {
    scale: f64,
    axes: AxisSelection,
}

impl CurveEmitter {
    pub fn new(scale: f64, axes: AxisSelection) -> Result<Self> {
        if !(scale > 0.0) || !scale.is_finite() {
            return Err(ConfigurationError::non_positive("scale", scale).into());
        }
        axes.validate()?;
        Ok(Self { scale, axes })
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn axes(&self) -> AxisSelection {
        self.axes
    }

    /// Emit `curve` as a path; the stroke is the wire diameter at scale
    ///
    /// The first sample becomes a move-to and each following run of three
    /// samples a curve-to. One or two samples left over at the end do not
    /// form a segment and are not drawn.
    pub fn emit(&self, curve: &[Point3<f64>], wire_diameter: f64) -> Result<EmittedPath> {
        let bounds = Bounds3::from_points(curve).ok_or(InsufficientDataError::EmptyCurve)?;
        let plane = self.axes.resolve(&bounds.extents());

        let (min_h, min_v) = plane.project(&bounds.min);
        let (max_h, max_v) = plane.project(&bounds.max);
        let width = (max_h - min_h) * self.scale;
        let height = (max_v - min_v) * self.scale;
        let padding = width.max(height) * PADDING_FRACTION;

        let points: Vec<Point2<f64>> = curve
            .iter()
            .map(|p| {
                let (h, v) = plane.project(p);
                Point2::new(
                    self.scale * (h - min_h) + padding,
                    self.scale * (v - min_v) + padding,
                )
            })
            .collect();

        let mut commands = Vec::with_capacity(1 + points.len() / 3);
        commands.push(PathCommand::MoveTo(points[0]));
        commands.extend(points[1..].chunks_exact(3).map(|run| PathCommand::CurveTo {
            control1: run[0],
            control2: run[1],
            end: run[2],
        }));

        debug!(
            "Emitted {} points on plane {} as {} curves ({:.3} x {:.3} mm, padding {:.3})",
            points.len(),
            plane,
            commands.len() - 1,
            width,
            height,
            padding
        );

        Ok(EmittedPath {
            points,
            commands,
            width,
            height,
            padding,
            plane,
            stroke_width: wire_diameter * self.scale,
        })
    }
}

impl Default for CurveEmitter {
    fn default() -> Self {
        Self {
            scale: 1.0,
            axes: AxisSelection::LargestSpread,
        }
    }
}
