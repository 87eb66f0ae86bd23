//! Command-line interface
//!
//! ```bash
//! # Defaults: scale 1, 5% smoothing budget, 1000 sampled facets
//! wirekit wire.stl wire.svg
//!
//! # Side view at 2x, tighter fit, fixed seed
//! wirekit wire.stl wire.svg --scale 2 --error 1 --axes yz --seed 42
//! ```

use crate::Config;
use clap::Parser;
use std::path::PathBuf;
use wirekit_core::AxisSelection;
use wirekit_settings::{LogFormat, LogLevel};

/// Wire mesh centerline to SVG converter
#[derive(Parser, Debug)]
#[command(name = "wirekit")]
#[command(author, version, about = "Convert an STL wire model into a smooth SVG centerline")]
pub struct Cli {
    /// Input STL file
    pub input_stl: PathBuf,

    /// Output SVG file
    pub output_svg: PathBuf,

    /// Scale factor from model units to millimeters
    #[arg(long)]
    pub scale: Option<f64>,

    /// Maximum smoothing error as a percentage of the wire diameter
    #[arg(long)]
    pub error: Option<f64>,

    /// Number of facets sampled for the pairwise search
    #[arg(long)]
    pub sample_size: Option<usize>,

    /// Seed for facet sampling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Drawing plane: auto, or two axes such as xy, yz, zx
    #[arg(long)]
    pub axes: Option<AxisSelection>,

    /// Worker threads for the pairwise search (default: all cores)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Configuration file (.json or .toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log format on stderr
    #[arg(long)]
    pub log_format: Option<LogFormat>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Overlay the flags that were given onto `config`
    pub fn apply(&self, config: &mut Config) {
        let pipeline = &mut config.pipeline;
        if let Some(scale) = self.scale {
            pipeline.scale = scale;
        }
        if let Some(error) = self.error {
            pipeline.max_error_percent = error;
        }
        if let Some(sample_size) = self.sample_size {
            pipeline.sample_size = sample_size;
        }
        if let Some(seed) = self.seed {
            pipeline.seed = seed;
        }
        if let Some(axes) = self.axes {
            pipeline.axes = axes;
        }
        if self.workers.is_some() {
            pipeline.workers = self.workers;
        }

        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
        config.logging.level = match self.verbose {
            0 => config.logging.level,
            1 => config.logging.level.max(LogLevel::Info),
            2 => config.logging.level.max(LogLevel::Debug),
            _ => LogLevel::Trace,
        };
    }
}
