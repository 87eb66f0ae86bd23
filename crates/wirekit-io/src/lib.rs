//! # WireKit IO
//!
//! File formats around the centerline pipeline: STL meshes in, SVG
//! drawings out.

pub mod stl;
pub mod svg;

pub use stl::MeshImporter;
pub use svg::SvgDocument;
