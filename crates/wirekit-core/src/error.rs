//! Error handling for WireKit
//!
//! Provides error types for every layer of the centerline pipeline:
//! - Configuration errors (invalid parameters)
//! - Insufficient data errors (a stage produced too little to continue)
//! - Numeric degeneracy errors (geometry the math cannot handle)
//! - Mesh load and I/O errors (surfaced from the outer collaborators)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Configuration error type
///
/// Raised when a pipeline parameter is outside its valid domain.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// A parameter that must be strictly positive was zero or negative
    #[error("{name} must be positive, got {value}")]
    NonPositive {
        /// The parameter name.
        name: String,
        /// The rejected value.
        value: f64,
    },

    /// A parameter was NaN or infinite
    #[error("{name} must be finite, got {value}")]
    NonFinite {
        /// The parameter name.
        name: String,
        /// The rejected value.
        value: f64,
    },

    /// A distance threshold was negative
    #[error("{name} must not be negative, got {value}")]
    Negative {
        /// The parameter name.
        name: String,
        /// The rejected value.
        value: f64,
    },

    /// The in-plane axes for 2D emission are unusable
    #[error("Invalid plane axes: {reason}")]
    InvalidPlaneAxes {
        /// Why the axes were rejected.
        reason: String,
    },
}

impl ConfigurationError {
    /// Shorthand for [`ConfigurationError::NonPositive`]
    pub fn non_positive(name: impl Into<String>, value: f64) -> Self {
        Self::NonPositive {
            name: name.into(),
            value,
        }
    }
}

/// Insufficient data error type
///
/// A stage ran to completion but left too little for the next stage.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InsufficientDataError {
    /// Too few centerline points survived deduplication
    #[error("Too few centerline points: need at least {required}, found {found}")]
    CenterlinePoints {
        /// Minimum number of points required.
        required: usize,
        /// Number of points available.
        found: usize,
    },

    /// Too few ordered points to fit a cubic curve
    #[error("Too few ordered points for a cubic fit: need at least {required}, found {found}")]
    SplinePoints {
        /// Minimum number of points required.
        required: usize,
        /// Number of points available.
        found: usize,
    },

    /// Nothing left to emit as a path
    #[error("Smoothed curve is empty")]
    EmptyCurve,
}

/// Numeric degeneracy error type
///
/// Per-pair degeneracy is never an error; these are the fatal cases.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NumericDegeneracyError {
    /// A facet centroid or normal contains NaN or infinity
    #[error("Facet {index} has a non-finite centroid or normal")]
    NonFiniteFacet {
        /// Index of the offending facet in the sampled set.
        index: usize,
    },

    /// Every facet pair was rejected and at least some were degenerate
    #[error("No candidate centerline points: {degenerate_pairs} of {tested_pairs} tested facet pairs were near-parallel")]
    EmptyCandidateSet {
        /// Facet pairs that reached the intersection test.
        tested_pairs: usize,
        /// Facet pairs skipped as near-parallel.
        degenerate_pairs: usize,
    },

    /// The spline fit could not build a valid parametrization
    #[error("Degenerate spline parametrization: {reason}")]
    SplineParametrization {
        /// What made the parametrization degenerate.
        reason: String,
    },
}

/// Main error type for WireKit
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Insufficient data error
    #[error(transparent)]
    InsufficientData(#[from] InsufficientDataError),

    /// Numeric degeneracy error
    #[error(transparent)]
    NumericDegeneracy(#[from] NumericDegeneracyError),

    /// The mesh could not be loaded or is malformed
    #[error("Mesh load error: {0}")]
    MeshLoad(String),

    /// The worker pool could not be created
    #[error("Worker pool error: {0}")]
    WorkerPool(String),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a mesh load error from a string message
    pub fn mesh_load(msg: impl Into<String>) -> Self {
        Error::MeshLoad(msg.into())
    }

    /// Check if this is a configuration error
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }

    /// Check if this is an insufficient data error
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, Error::InsufficientData(_))
    }

    /// Check if this is a numeric degeneracy error
    pub fn is_numeric_degeneracy(&self) -> bool {
        matches!(self, Error::NumericDegeneracy(_))
    }

    /// Check if this is a mesh load error
    pub fn is_mesh_load_error(&self) -> bool {
        matches!(self, Error::MeshLoad(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
