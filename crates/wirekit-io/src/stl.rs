//! STL import
//!
//! Reads ASCII or binary STL through `stl_io` and reduces every triangle to
//! the centroid and unit normal the centerline pipeline works on. Normals
//! are recomputed from the vertices; stored STL normals are often zero or
//! stale.

use nalgebra::{Point3, Vector3};
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use tracing::{debug, warn};
use wirekit_core::{Bounds3, Error, FacetSet, MeshInput, Result};

/// Triangles whose doubled area is below this fraction of their longest
/// squared edge are treated as zero-area.
const MIN_RELATIVE_AREA: f64 = 1e-12;

/// Centroid and unit normal of a triangle, `None` when it has no area
pub fn triangle_facet(
    a: &Point3<f64>,
    b: &Point3<f64>,
    c: &Point3<f64>,
) -> Option<(Point3<f64>, Vector3<f64>)> {
    let cross = (b - a).cross(&(c - a));
    let longest = (b - a)
        .norm_squared()
        .max((c - b).norm_squared())
        .max((a - c).norm_squared());

    let area2 = cross.norm();
    if !(area2 > MIN_RELATIVE_AREA * longest) || !area2.is_finite() {
        return None;
    }

    let centroid = Point3::from((a.coords + b.coords + c.coords) / 3.0);
    Some((centroid, cross / area2))
}

/// Loads STL meshes as [`MeshInput`]
#[derive(Debug, Clone, Copy, Default)]
pub struct MeshImporter;

impl MeshImporter {
    pub fn new() -> Self {
        Self
    }

    /// Import an STL file; the extension must be `.stl`
    pub fn import_file(&self, path: impl AsRef<Path>) -> Result<MeshInput> {
        let path = path.as_ref();
        debug!("Importing STL file: {}", path.display());
        detect_format(path)?;

        let mut file = std::fs::File::open(path).map_err(|e| {
            Error::mesh_load(format!("Failed to open STL file {}: {}", path.display(), e))
        })?;
        self.read(&mut file, &path.display().to_string())
    }

    /// Import STL content already in memory
    pub fn import_data(&self, data: &[u8]) -> Result<MeshInput> {
        debug!("Importing STL from data ({} bytes)", data.len());
        self.read(&mut Cursor::new(data), "data")
    }

    fn read<R: Read + Seek>(&self, reader: &mut R, origin: &str) -> Result<MeshInput> {
        let stl = stl_io::read_stl(reader)
            .map_err(|e| Error::mesh_load(format!("Failed to parse STL {}: {}", origin, e)))?;
        debug!(
            "STL contains {} faces over {} vertices",
            stl.faces.len(),
            stl.vertices.len()
        );
        self.to_mesh_input(&stl)
    }

    fn to_mesh_input(&self, stl: &stl_io::IndexedMesh) -> Result<MeshInput> {
        let vertices: Vec<Point3<f64>> = stl
            .vertices
            .iter()
            .map(|v| Point3::new(v[0] as f64, v[1] as f64, v[2] as f64))
            .collect();

        let mut pairs = Vec::with_capacity(stl.faces.len());
        let mut dropped = 0usize;

        for face in &stl.faces {
            let [i, j, k] = face.vertices;
            let (Some(a), Some(b), Some(c)) = (vertices.get(i), vertices.get(j), vertices.get(k))
            else {
                return Err(Error::mesh_load(format!(
                    "face references missing vertex ({}, {}, {})",
                    i, j, k
                )));
            };

            match triangle_facet(a, b, c) {
                Some(facet) => pairs.push(facet),
                None => dropped += 1,
            }
        }

        if dropped > 0 {
            warn!("Dropped {} zero-area triangles", dropped);
        }
        if pairs.is_empty() {
            return Err(Error::mesh_load("mesh contains no usable triangles"));
        }

        let bounds = Bounds3::from_points(&vertices)
            .ok_or_else(|| Error::mesh_load("mesh has no vertices"))?;
        debug!(
            "Mesh bounds: {:?} to {:?} (diagonal {:.4})",
            bounds.min,
            bounds.max,
            bounds.diagonal()
        );

        MeshInput::new(FacetSet::from_pairs(pairs), bounds.diagonal())
    }
}

fn detect_format(path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_lowercase())
        .ok_or_else(|| {
            Error::mesh_load(format!(
                "Unable to determine file extension for: {}",
                path.display()
            ))
        })?;

    match extension.as_str() {
        "stl" => Ok(()),
        _ => Err(Error::mesh_load(format!(
            "Unsupported mesh format: .{}",
            extension
        ))),
    }
}
