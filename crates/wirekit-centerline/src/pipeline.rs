//! Five-stage centerline pipeline
//!
//! `MeshSampler → PairwiseAxisIntersector → PointCloudOrderer →
//! SplineSmoother → CurveEmitter`, run strictly in sequence. Only the
//! intersection stage fans out, onto the [`WorkerPool`] owned by the
//! pipeline. A failing stage stops the run; nothing partial is returned.

use crate::emitter::{CurveEmitter, EmittedPath};
use crate::intersector::{PairwiseAxisIntersector, DEFAULT_COARSE_PRUNE_MULTIPLIER};
use crate::orderer::{OrderedCenterline, PointCloudOrderer};
use crate::pool::WorkerPool;
use crate::sampler::{MeshSampler, DEFAULT_SAMPLE_SIZE};
use crate::smoother::{SmoothedCurve, SplineSmoother, DEFAULT_MAX_ERROR_PERCENT};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};
use wirekit_core::{AxisSelection, ConfigurationError, MeshInput, Result};

/// Default acceptance distance as a fraction of the mesh extent diagonal
pub const DEFAULT_MAX_DISTANCE_FRACTION: f64 = 0.01;

/// Tunable parameters of a pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Model units to millimeters in the emitted drawing
    pub scale: f64,
    /// Smoothing budget, percent of the wire diameter
    pub max_error_percent: f64,
    /// Upper bound on facets entering the pairwise search
    pub sample_size: usize,
    pub seed: u64,
    /// Acceptance distance relative to the extent diagonal
    pub max_distance_fraction: f64,
    pub coarse_prune_multiplier: f64,
    pub axes: AxisSelection,
    /// Worker threads; `None` uses the available parallelism
    pub workers: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            max_error_percent: DEFAULT_MAX_ERROR_PERCENT,
            sample_size: DEFAULT_SAMPLE_SIZE,
            seed: 0,
            max_distance_fraction: DEFAULT_MAX_DISTANCE_FRACTION,
            coarse_prune_multiplier: DEFAULT_COARSE_PRUNE_MULTIPLIER,
            axes: AxisSelection::default(),
            workers: None,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> std::result::Result<(), ConfigurationError> {
        positive("scale", self.scale)?;
        positive("max_error_percent", self.max_error_percent)?;
        positive("max_distance_fraction", self.max_distance_fraction)?;
        positive("coarse_prune_multiplier", self.coarse_prune_multiplier)?;
        if self.sample_size == 0 {
            return Err(ConfigurationError::non_positive("sample_size", 0.0));
        }
        if self.workers == Some(0) {
            return Err(ConfigurationError::non_positive("workers", 0.0));
        }
        self.axes.validate()
    }
}

fn positive(name: &str, value: f64) -> std::result::Result<(), ConfigurationError> {
    if !value.is_finite() {
        return Err(ConfigurationError::NonFinite {
            name: name.to_string(),
            value,
        });
    }
    if value <= 0.0 {
        return Err(ConfigurationError::non_positive(name, value));
    }
    Ok(())
}

/// Counters collected along a run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineStats {
    pub input_facets: usize,
    pub sampled_facets: usize,
    pub max_distance: f64,
    pub tested_pairs: usize,
    pub pruned_pairs: usize,
    pub degenerate_pairs: usize,
    pub candidates: usize,
    pub partitions: usize,
    pub workers: usize,
    pub elapsed_ms: u128,
}

/// Everything a run produces
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub centerline: OrderedCenterline,
    pub curve: SmoothedCurve,
    pub path: EmittedPath,
    pub stats: PipelineStats,
}

impl PipelineOutput {
    pub fn wire_diameter(&self) -> f64 {
        self.centerline.wire_diameter
    }

    pub fn number_of_curves(&self) -> usize {
        self.curve.number_of_curves
    }
}

/// Validated configuration plus the worker pool it runs on
///
/// The pool is created once and reused for every [`run`](Self::run).
#[derive(Debug)]
pub struct CenterlinePipeline {
    config: PipelineConfig,
    pool: WorkerPool,
}

impl CenterlinePipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let pool = match config.workers {
            Some(n) => WorkerPool::new(n)?,
            None => WorkerPool::with_available_parallelism()?,
        };
        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn workers(&self) -> usize {
        self.pool.size()
    }

    pub fn run(&self, mesh: &MeshInput) -> Result<PipelineOutput> {
        let started = Instant::now();
        let config = &self.config;
        let mut stats = PipelineStats {
            input_facets: mesh.facets.len(),
            workers: self.pool.size(),
            ..Default::default()
        };

        let sampler = MeshSampler::new(config.sample_size, config.seed)?;
        let sampled = sampler.sample(&mesh.facets);
        stats.sampled_facets = sampled.len();

        stats.max_distance = mesh.extent_diagonal * config.max_distance_fraction;
        let intersector = PairwiseAxisIntersector::new(stats.max_distance)?
            .with_coarse_prune_multiplier(config.coarse_prune_multiplier)?;
        let report = intersector.intersect(&sampled, &self.pool)?;
        stats.tested_pairs = report.tested_pairs;
        stats.pruned_pairs = report.pruned_pairs;
        stats.degenerate_pairs = report.degenerate_pairs;
        stats.candidates = report.candidates.len();
        stats.partitions = report.partitions;

        let centerline = PointCloudOrderer::new().order(&report.candidates)?;

        let smoother = SplineSmoother::new(config.max_error_percent)?;
        let curve = smoother.smooth(&centerline.points, centerline.wire_diameter)?;

        let emitter = CurveEmitter::new(config.scale, config.axes)?;
        let path = emitter.emit(&curve.points, centerline.wire_diameter)?;

        stats.elapsed_ms = started.elapsed().as_millis();
        debug!("Pipeline stats: {:?}", stats);
        info!(
            "Reconstructed centerline: {} facets, {} candidates, {} points, {} curves in {} ms",
            stats.sampled_facets,
            stats.candidates,
            centerline.len(),
            curve.number_of_curves,
            stats.elapsed_ms
        );

        Ok(PipelineOutput {
            centerline,
            curve,
            path,
            stats,
        })
    }
}
