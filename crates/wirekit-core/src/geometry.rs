//! Facet and bounding-box types shared by every pipeline stage
//!
//! The mesh is consumed as two index-aligned arrays: one centroid and one
//! unit normal per triangle. [`FacetSet`] owns both and refuses to exist
//! with mismatched lengths, so the pairing survives sampling and filtering.

use crate::error::{Error, Result};
use nalgebra::{Point3, Vector3};

/// Index-aligned facet centroids and normals
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FacetSet {
    centroids: Vec<Point3<f64>>,
    normals: Vec<Vector3<f64>>,
}

impl FacetSet {
    /// Build a facet set, rejecting misaligned arrays
    pub fn new(centroids: Vec<Point3<f64>>, normals: Vec<Vector3<f64>>) -> Result<Self> {
        if centroids.len() != normals.len() {
            return Err(Error::mesh_load(format!(
                "centroid/normal count mismatch: {} centroids, {} normals",
                centroids.len(),
                normals.len()
            )));
        }
        Ok(Self { centroids, normals })
    }

    /// Build a facet set from (centroid, normal) pairs
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Point3<f64>, Vector3<f64>)>) -> Self {
        let (centroids, normals) = pairs.into_iter().unzip();
        Self { centroids, normals }
    }

    /// Keep only the facets at `indices`, in the order given
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            centroids: indices.iter().map(|&i| self.centroids[i]).collect(),
            normals: indices.iter().map(|&i| self.normals[i]).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.centroids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centroids.is_empty()
    }

    pub fn centroids(&self) -> &[Point3<f64>] {
        &self.centroids
    }

    pub fn normals(&self) -> &[Vector3<f64>] {
        &self.normals
    }

    /// Iterate over (centroid, normal) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&Point3<f64>, &Vector3<f64>)> {
        self.centroids.iter().zip(self.normals.iter())
    }

    /// Bounding box of the centroids, `None` when empty
    pub fn centroid_bounds(&self) -> Option<Bounds3> {
        Bounds3::from_points(&self.centroids)
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds3 {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Bounds3 {
    /// Smallest box containing every point, `None` for an empty slice
    pub fn from_points(points: &[Point3<f64>]) -> Option<Self> {
        let first = points.first()?;
        let mut min = *first;
        let mut max = *first;

        for p in &points[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }

        Some(Self { min, max })
    }

    /// Edge lengths along x, y and z
    pub fn extents(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Length of the box diagonal
    pub fn diagonal(&self) -> f64 {
        self.extents().norm()
    }
}

/// Everything the centerline pipeline needs from a loaded mesh
#[derive(Debug, Clone, PartialEq)]
pub struct MeshInput {
    pub facets: FacetSet,
    /// Diagonal of the source mesh bounding box, in model units
    pub extent_diagonal: f64,
}

impl MeshInput {
    pub fn new(facets: FacetSet, extent_diagonal: f64) -> Result<Self> {
        if !extent_diagonal.is_finite() || extent_diagonal < 0.0 {
            return Err(Error::mesh_load(format!(
                "invalid bounding-box diagonal {}",
                extent_diagonal
            )));
        }
        Ok(Self {
            facets,
            extent_diagonal,
        })
    }

    /// Use the centroid bounding box as the extent
    ///
    /// Slightly smaller than the vertex bounding box of the source mesh;
    /// intended for synthetic facet sets that have no vertices.
    pub fn from_facets(facets: FacetSet) -> Result<Self> {
        let diagonal = facets
            .centroid_bounds()
            .map(|b| b.diagonal())
            .unwrap_or(0.0);
        Self::new(facets, diagonal)
    }
}
