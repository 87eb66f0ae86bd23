//! # WireKit Centerline
//!
//! Reconstructs the centerline of a thin wire-like mesh and fits it with a
//! smooth cubic Bezier path.
//!
//! ## Stages
//!
//! 1. [`MeshSampler`] bounds the facet count with a seeded sample
//! 2. [`PairwiseAxisIntersector`] intersects facet-normal lines in parallel
//! 3. [`PointCloudOrderer`] deduplicates, orders and measures the candidates
//! 4. [`SplineSmoother`] fits an error-bounded smoothing spline
//! 5. [`CurveEmitter`] projects to a plane and groups cubic segments
//!
//! [`CenterlinePipeline`] wires the stages together over a reusable
//! [`WorkerPool`].

pub mod emitter;
pub mod intersector;
pub mod orderer;
pub mod pipeline;
pub mod pool;
pub mod sampler;
pub mod smoother;

pub use emitter::{CurveEmitter, EmittedPath, PathCommand};
pub use intersector::{
    closest_point_between_lines, IntersectionReport, LineApproach, PairwiseAxisIntersector,
};
pub use orderer::{dedup_points, OrderedCenterline, PointCloudOrderer};
pub use pipeline::{CenterlinePipeline, PipelineConfig, PipelineOutput, PipelineStats};
pub use pool::WorkerPool;
pub use sampler::MeshSampler;
pub use smoother::{smoothing_tolerance, SmoothedCurve, SplineSmoother};
