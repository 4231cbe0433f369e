//! Configured, one-shot sampling.
//!
//! [`Sampler`] holds the sample size and an optional seed. Every call builds
//! its own generator, so a single `Sampler` can be shared freely across
//! threads without any shared RNG state.

use rand::prelude::*;

use crate::error::{Result, SampleError};
use crate::reservoir::{sample_with_rng, try_sample_with_rng};

/// Draws uniform samples of at most `k` items from streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sampler {
    k: usize,
    seed: Option<u64>,
}

impl Sampler {
    /// Create a sampler that keeps at most `k` items.
    pub fn new(k: usize) -> Self {
        Self { k, seed: None }
    }

    /// Create a sampler from a signed size.
    ///
    /// Negative sizes are a caller error and are rejected here, before any
    /// stream is touched.
    pub fn try_new(k: i64) -> Result<Self> {
        if k < 0 {
            return Err(SampleError::NegativeSampleSize(k));
        }
        let k = usize::try_from(k).map_err(|_| SampleError::SampleSizeOverflow(k))?;
        Ok(Self::new(k))
    }

    /// Set random seed.
    ///
    /// Each call to [`Sampler::sample`] restarts from this seed, so the same
    /// stream always yields the same sample.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sample size `k`.
    pub fn k(&self) -> usize {
        self.k
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Sample at most `k` items from `stream`.
    ///
    /// The whole stream is consumed. Result length is `min(k, n)`.
    pub fn sample<I>(&self, stream: I) -> Vec<I::Item>
    where
        I: IntoIterator,
    {
        let mut rng = self.rng();
        sample_with_rng(self.k, stream, &mut *rng)
    }

    /// Sample from a fallible stream, returning the stream's first error as is.
    pub fn try_sample<I, T, E>(&self, stream: I) -> std::result::Result<Vec<T>, E>
    where
        I: IntoIterator<Item = std::result::Result<T, E>>,
    {
        let mut rng = self.rng();
        try_sample_with_rng(self.k, stream, &mut *rng)
    }

    fn rng(&self) -> Box<dyn RngCore> {
        match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        }
    }
}

/// Iterator extension for reservoir sampling.
pub trait ReservoirSampleExt: Iterator + Sized {
    /// Take a uniform sample of at most `k` items using the thread-local RNG.
    fn reservoir_sample(self, k: usize) -> Vec<Self::Item> {
        crate::reservoir::sample(k, self)
    }

    /// Take a uniform sample of at most `k` items using `rng`.
    fn reservoir_sample_with<R: Rng + ?Sized>(self, k: usize, rng: &mut R) -> Vec<Self::Item> {
        sample_with_rng(k, self, rng)
    }
}

impl<I: Iterator> ReservoirSampleExt for I {}
