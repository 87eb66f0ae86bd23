//! Coordinate axes and in-plane axis selection
//!
//! The emitted drawing is 2D, so one of the three model axes has to go.
//! Which one is a convention of the downstream consumer, never an implicit
//! array index: callers pick a fixed [`PlaneAxes`] or let
//! [`AxisSelection::LargestSpread`] choose from the curve extent.

use crate::error::ConfigurationError;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Model coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index into a point or vector
    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// Coordinate of `point` along this axis
    pub fn of(self, point: &Point3<f64>) -> f64 {
        point[self.index()]
    }

    /// Component of `vector` along this axis
    pub fn component(self, vector: &Vector3<f64>) -> f64 {
        vector[self.index()]
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "x"),
            Self::Y => write!(f, "y"),
            Self::Z => write!(f, "z"),
        }
    }
}

impl FromStr for Axis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "x" => Ok(Self::X),
            "y" => Ok(Self::Y),
            "z" => Ok(Self::Z),
            _ => Err(format!("Unknown axis: {}", s)),
        }
    }
}

/// Ordered pair of model axes mapped to drawing (horizontal, vertical)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaneAxes {
    pub horizontal: Axis,
    pub vertical: Axis,
}

impl PlaneAxes {
    /// Top view, drops Z
    pub const XY: PlaneAxes = PlaneAxes::new_unchecked(Axis::X, Axis::Y);
    /// Side view, drops X
    pub const YZ: PlaneAxes = PlaneAxes::new_unchecked(Axis::Y, Axis::Z);
    /// Front view, drops Y
    pub const ZX: PlaneAxes = PlaneAxes::new_unchecked(Axis::Z, Axis::X);

    const fn new_unchecked(horizontal: Axis, vertical: Axis) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    pub fn new(horizontal: Axis, vertical: Axis) -> Result<Self, ConfigurationError> {
        let axes = Self::new_unchecked(horizontal, vertical);
        axes.validate()?;
        Ok(axes)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.horizontal == self.vertical {
            return Err(ConfigurationError::InvalidPlaneAxes {
                reason: format!(
                    "horizontal and vertical are both {}",
                    self.horizontal
                ),
            });
        }
        Ok(())
    }

    /// Project a model point to (horizontal, vertical)
    pub fn project(&self, point: &Point3<f64>) -> (f64, f64) {
        (self.horizontal.of(point), self.vertical.of(point))
    }
}

impl Default for PlaneAxes {
    fn default() -> Self {
        Self::XY
    }
}

impl fmt::Display for PlaneAxes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.horizontal, self.vertical)
    }
}

impl FromStr for PlaneAxes {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(h), Some(v), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(format!("Plane axes must be two letters, got: {}", s));
        };
        let horizontal = h.to_string().parse::<Axis>()?;
        let vertical = v.to_string().parse::<Axis>()?;
        PlaneAxes::new(horizontal, vertical).map_err(|e| e.to_string())
    }
}

/// Policy for choosing the in-plane axes of the emitted drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisSelection {
    /// Largest spread runs horizontally, second largest vertically
    LargestSpread,
    /// Always use the given pair
    Fixed(PlaneAxes),
}

impl AxisSelection {
    /// Resolve the policy against the extents of the curve being emitted
    ///
    /// Equal spreads keep model order, so X wins over Y and Y over Z. A
    /// straight wire along X therefore lands on the top view.
    pub fn resolve(&self, extents: &Vector3<f64>) -> PlaneAxes {
        match self {
            Self::Fixed(axes) => *axes,
            Self::LargestSpread => {
                let mut ranked = Axis::ALL;
                ranked.sort_by(|a, b| b.component(extents).total_cmp(&a.component(extents)));
                PlaneAxes::new_unchecked(ranked[0], ranked[1])
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        match self {
            Self::Fixed(axes) => axes.validate(),
            Self::LargestSpread => Ok(()),
        }
    }
}

impl Default for AxisSelection {
    fn default() -> Self {
        Self::LargestSpread
    }
}

impl fmt::Display for AxisSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LargestSpread => write!(f, "auto"),
            Self::Fixed(axes) => write!(f, "{}", axes),
        }
    }
}

impl FromStr for AxisSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" | "largest_spread" => Ok(Self::LargestSpread),
            other => other.parse::<PlaneAxes>().map(Self::Fixed),
        }
    }
}
