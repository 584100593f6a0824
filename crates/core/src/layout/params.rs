//! Layout analysis parameters.
//!
//! Contains `DocstrumParams` for controlling page segmentation, plus the
//! `AngleBounds` and `Parallelism` values it is built from.

use std::num::NonZeroUsize;

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{LayoutError, Result};

/// Closed interval of angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleBounds {
    lower: f64,
    upper: f64,
}

impl AngleBounds {
    /// Creates bounds `[lower, upper]`.
    ///
    /// Fails if either end is not finite or `lower > upper`.
    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        if !lower.is_finite() || !upper.is_finite() || lower > upper {
            return Err(LayoutError::InvalidAngleBounds { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    pub const fn lower(&self) -> f64 {
        self.lower
    }

    pub const fn upper(&self) -> f64 {
        self.upper
    }

    /// Inclusive on both ends.
    pub fn contains(&self, angle: f64) -> bool {
        (self.lower..=self.upper).contains(&angle)
    }
}

/// Upper bound on worker threads used by the data-parallel phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parallelism {
    /// As many threads as the host reports available.
    #[default]
    Available,
    /// At most this many threads.
    Bounded(NonZeroUsize),
    /// No bound: run on rayon's global pool.
    Unbounded,
}

impl Parallelism {
    /// Single-threaded execution.
    pub const fn sequential() -> Self {
        Self::Bounded(NonZeroUsize::MIN)
    }

    /// Maps a thread count to a setting; `0` means unbounded.
    pub fn from_thread_count(n: usize) -> Self {
        NonZeroUsize::new(n).map_or(Self::Unbounded, Self::Bounded)
    }

    /// Builds the worker pool for this setting, `None` for the global pool.
    pub(crate) fn build_pool(self) -> Result<Option<ThreadPool>> {
        let threads = match self {
            Self::Available => default_thread_count(),
            Self::Bounded(n) => n.get(),
            Self::Unbounded => return Ok(None),
        };
        let pool = ThreadPoolBuilder::new().num_threads(threads).build()?;
        Ok(Some(pool))
    }
}

pub(crate) fn default_thread_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Parameters for docstrum page segmentation.
#[derive(Debug, Clone, PartialEq)]
pub struct DocstrumParams {
    /// Angles (from a word's bottom-right to a neighbour's bottom-left) that
    /// count as "same line".
    pub within_line_bounds: AngleBounds,

    /// Angles (centroid to centroid) that count as "next line down".
    pub between_line_bounds: AngleBounds,

    /// Scales the estimated between-line distance into the maximum gap
    /// allowed between two lines of the same block.
    pub between_line_multiplier: f64,

    /// Bound on worker threads for neighbour searches.
    pub parallelism: Parallelism,
}

impl Default for DocstrumParams {
    fn default() -> Self {
        Self {
            within_line_bounds: AngleBounds {
                lower: -30.0,
                upper: 30.0,
            },
            between_line_bounds: AngleBounds {
                lower: -135.0,
                upper: -45.0,
            },
            between_line_multiplier: 1.3,
            parallelism: Parallelism::Available,
        }
    }
}

impl DocstrumParams {
    /// Creates parameters with the specified values.
    ///
    /// Fails if the multiplier is not a finite positive number.
    pub fn new(
        within_line_bounds: AngleBounds,
        between_line_bounds: AngleBounds,
        between_line_multiplier: f64,
        parallelism: Parallelism,
    ) -> Result<Self> {
        let params = Self {
            within_line_bounds,
            between_line_bounds,
            between_line_multiplier,
            parallelism,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let m = self.between_line_multiplier;
        if !m.is_finite() || m <= 0.0 {
            return Err(LayoutError::InvalidMultiplier(m));
        }
        Ok(())
    }
}
