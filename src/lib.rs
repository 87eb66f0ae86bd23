//! # WireKit
//!
//! Reconstructs the centerline of a thin wire-like 3D mesh and writes it as
//! a smooth cubic Bezier path in an SVG document.
//!
//! ## Architecture
//!
//! WireKit is organized as a workspace with multiple crates:
//!
//! 1. **wirekit-core** - Facet arrays, bounds, plane axes, error taxonomy
//! 2. **wirekit-centerline** - Sampling, pairwise intersection, ordering,
//!    smoothing and emission, plus the pipeline and its worker pool
//! 3. **wirekit-io** - STL import and atomic SVG export
//! 4. **wirekit-settings** - JSON/TOML configuration
//! 5. **wirekit** - Command-line binary tying the crates together

use std::path::{Path, PathBuf};
use tracing::info;

pub mod cli;

pub use cli::Cli;

pub use wirekit_centerline::{
    CenterlinePipeline, EmittedPath, PipelineConfig, PipelineOutput, PipelineStats,
};
pub use wirekit_core::{Error, MeshInput, Result};
pub use wirekit_io::{MeshImporter, SvgDocument};
pub use wirekit_settings::{Config, LogFormat, LogLevel};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging
///
/// Sets up structured logging with:
/// - Output on stderr, keeping stdout for results
/// - RUST_LOG environment variable support, overriding `level`
/// - Plain text or JSON lines
pub fn init_logging(level: LogLevel, format: LogFormat) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_names(true);

    match format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?,
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.json())
            .try_init()?,
    }

    Ok(())
}

/// Result of a successful conversion
#[derive(Debug, Clone)]
pub struct ConversionSummary {
    pub output: PathBuf,
    pub wire_diameter: f64,
    pub number_of_curves: usize,
    pub stats: PipelineStats,
}

/// Load `input`, run the pipeline and write the SVG to `output`
///
/// Nothing is written unless every stage succeeds.
pub fn convert(input: &Path, output: &Path, config: &Config) -> Result<ConversionSummary> {
    let mesh = MeshImporter::new().import_file(input)?;
    info!(
        "Loaded {} facets from {} (extent diagonal {:.4})",
        mesh.facets.len(),
        input.display(),
        mesh.extent_diagonal
    );

    let pipeline = CenterlinePipeline::new(config.pipeline.clone())?;
    let result = pipeline.run(&mesh)?;

    SvgDocument::from_path(&result.path)
        .with_stroke_color(config.output.stroke_color.clone())
        .with_precision(config.output.precision)
        .save(output, config.output.overwrite)?;

    Ok(ConversionSummary {
        output: output.to_path_buf(),
        wire_diameter: result.wire_diameter(),
        number_of_curves: result.number_of_curves(),
        stats: result.stats,
    })
}
