//! Facet sampling
//!
//! The pairwise search is quadratic in the facet count, so large meshes
//! are reduced to a bounded working set first. Sampling is without
//! replacement and seeded, so the same mesh and seed always give the
//! same subset.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;
use wirekit_core::{ConfigurationError, FacetSet, Result};

/// Default upper bound on the working facet count
pub const DEFAULT_SAMPLE_SIZE: usize = 1000;

/// Reduces a facet set to at most `sample_size` facets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshSampler {
    sample_size: usize,
    seed: u64,
}

impl MeshSampler {
    /// Create a sampler; a zero sample size is a configuration error
    pub fn new(sample_size: usize, seed: u64) -> Result<Self> {
        if sample_size == 0 {
            return Err(ConfigurationError::non_positive("sample_size", 0.0).into());
        }
        Ok(Self { sample_size, seed })
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Pick at most `sample_size` facets
    ///
    /// Returns the input unchanged when it is already small enough.
    /// Selected facets keep their original relative order.
    pub fn sample(&self, facets: &FacetSet) -> FacetSet {
        if facets.len() <= self.sample_size {
            debug!(
                "Keeping all {} facets (sample size {})",
                facets.len(),
                self.sample_size
            );
            return facets.clone();
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut indices =
            rand::seq::index::sample(&mut rng, facets.len(), self.sample_size).into_vec();
        indices.sort_unstable();

        debug!(
            "Sampled {} of {} facets with seed {}",
            indices.len(),
            facets.len(),
            self.seed
        );

        facets.select(&indices)
    }
}

impl Default for MeshSampler {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            seed: 0,
        }
    }
}
