//! Fixed-size worker pool with ordered scatter/gather
//!
//! Work is split into static, contiguous index ranges. Each range is handed
//! to a worker, and results come back in range order no matter which worker
//! finishes first.

use rayon::prelude::*;
use rayon::ThreadPool;
use std::ops::Range;
use tracing::debug;
use wirekit_core::{ConfigurationError, Error, Result};

/// Thread pool used for the pairwise facet search
#[derive(Debug)]
pub struct WorkerPool {
    pool: ThreadPool,
    size: usize,
}

impl WorkerPool {
    /// Create a pool with exactly `size` worker threads
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(ConfigurationError::non_positive("workers", 0.0).into());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(size)
            .thread_name(|i| format!("wirekit-worker-{}", i))
            .build()
            .map_err(|e| Error::WorkerPool(e.to_string()))?;

        debug!("Created worker pool with {} threads", size);
        Ok(Self { pool, size })
    }

    /// Create a pool sized to the available hardware parallelism
    pub fn with_available_parallelism() -> Result<Self> {
        Self::new(available_parallelism())
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Run `task` on every partition and return the results in partition order
    ///
    /// `task` receives the partition index and its range. All partitions
    /// complete before this returns.
    pub fn scatter_gather<T, F>(&self, partitions: &[Range<usize>], task: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize, Range<usize>) -> T + Send + Sync,
    {
        self.pool.install(|| {
            partitions
                .par_iter()
                .enumerate()
                .map(|(index, range)| task(index, range.clone()))
                .collect()
        })
    }
}

/// Number of hardware threads, at least one
pub fn available_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Split `0..len` into at most `count` contiguous, non-empty ranges
///
/// Earlier ranges are never shorter than later ones. An empty input yields
/// no ranges.
pub fn partition(len: usize, count: usize) -> Vec<Range<usize>> {
    if len == 0 || count == 0 {
        return Vec::new();
    }

    let count = count.min(len);
    let base = len / count;
    let extra = len % count;

    let mut ranges = Vec::with_capacity(count);
    let mut start = 0;
    for i in 0..count {
        let size = base + usize::from(i < extra);
        ranges.push(start..start + size);
        start += size;
    }
    ranges
}
