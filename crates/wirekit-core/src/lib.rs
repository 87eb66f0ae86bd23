//! # WireKit Core
//!
//! Core types and the error taxonomy shared by the WireKit crates.
//! Provides the index-aligned facet arrays consumed by the centerline
//! pipeline, bounding boxes, and the in-plane axis conventions used when
//! flattening the reconstructed curve to 2D.

pub mod axis;
pub mod error;
pub mod geometry;

pub use axis::{Axis, AxisSelection, PlaneAxes};
pub use error::{
    ConfigurationError, Error, InsufficientDataError, NumericDegeneracyError, Result,
};
pub use geometry::{Bounds3, FacetSet, MeshInput};

pub use nalgebra::{Point2, Point3, Vector3};
