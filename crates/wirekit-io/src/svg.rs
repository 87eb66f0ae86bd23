//! SVG export of an emitted Bezier path
//!
//! Documents are sized in millimeters with a viewBox in the same units, so
//! one path unit is one millimeter on paper.

use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};
use wirekit_centerline::EmittedPath;
use wirekit_core::Result;

pub const DEFAULT_STROKE_COLOR: &str = "black";
pub const DEFAULT_PRECISION: usize = 4;

/// Single-path SVG document
#[derive(Debug, Clone, PartialEq)]
pub struct SvgDocument {
    pub width: f64,
    pub height: f64,
    pub path: EmittedPath,
    pub stroke_color: String,
    /// Decimal places for every emitted number
    pub precision: usize,
}

impl SvgDocument {
    pub fn from_path(path: &EmittedPath) -> Self {
        Self {
            width: path.document_width(),
            height: path.document_height(),
            path: path.clone(),
            stroke_color: DEFAULT_STROKE_COLOR.to_string(),
            precision: DEFAULT_PRECISION,
        }
    }

    pub fn with_stroke_color(mut self, color: impl Into<String>) -> Self {
        self.stroke_color = color.into();
        self
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn to_svg_string(&self) -> String {
        let p = self.precision;
        let mut svg = String::new();
        svg.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n");
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" width=\"{:.*}mm\" height=\"{:.*}mm\" viewBox=\"0 0 {:.*} {:.*}\">\n",
            p, self.width, p, self.height, p, self.width, p, self.height
        ));
        svg.push_str(&format!(
            "  <path d=\"{}\" stroke=\"{}\" fill=\"none\" stroke-width=\"{:.*}\" />\n",
            self.path.path_data(p),
            escape_attribute(&self.stroke_color),
            p,
            self.path.stroke_width
        ));
        svg.push_str("</svg>\n");
        svg
    }

    /// Write the document to `target` through a temporary file
    ///
    /// The content lands in the target directory first and is renamed into
    /// place, so a failed write never leaves a partial document. An
    /// existing target is an error unless `overwrite` is set.
    pub fn save(&self, target: impl AsRef<Path>, overwrite: bool) -> Result<()> {
        let target = target.as_ref();
        if !overwrite && target.exists() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} already exists", target.display()),
            )
            .into());
        }

        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(self.to_svg_string().as_bytes())?;
        file.flush()?;
        debug!("Wrote SVG to temporary file {}", file.path().display());

        if overwrite {
            file.persist(target).map_err(|e| e.error)?;
        } else {
            file.persist_noclobber(target).map_err(|e| e.error)?;
        }

        info!(
            "Saved SVG {} ({:.2} x {:.2} mm)",
            target.display(),
            self.width,
            self.height
        );
        Ok(())
    }
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
