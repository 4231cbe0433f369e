//! Reservoir sampling.
//!
//! Maintains a uniform sample of size `k` from a stream of unknown length,
//! in one pass and O(k) memory.
//!
//! Uses **Algorithm R** (Vitter, 1985): the first `k` items fill the
//! reservoir; item `i > k` is accepted with probability `k / i` and, when
//! accepted, overwrites a uniformly chosen slot. After `n >= k` items every
//! item is retained with probability exactly `k / n`, whatever the order of
//! arrival.
//!
//! ## References
//!
//! - Vitter (1985): *Random Sampling with a Reservoir*, "Algorithm R".
//!
//! Notes:
//! - `*_with_rng` entrypoints take a caller-supplied RNG for deterministic
//!   testing/benchmarking. The plain variants use `rand::rng()`, a
//!   thread-local generator seeded from OS entropy.

use rand::prelude::*;

/// Upper bound on the up-front allocation made by [`Reservoir::new`].
///
/// Larger reservoirs grow on demand, so a huge `k` over a short stream costs
/// `min(k, n)` slots rather than `k`.
const MAX_PREALLOC: usize = 1 << 12;

/// Incremental Algorithm R state: the reservoir plus the arrival counter.
///
/// Invariant: `samples().len() == min(k, seen())`.
#[derive(Debug, Clone)]
pub struct Reservoir<T> {
    k: usize,
    seen: u64,
    samples: Vec<T>,
}

impl<T> Reservoir<T> {
    /// Create an empty reservoir that keeps at most `k` items.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            seen: 0,
            samples: Vec::with_capacity(k.min(MAX_PREALLOC)),
        }
    }

    /// Add an item from the stream.
    ///
    /// If `k == 0`, this discards all items.
    #[inline]
    pub fn add(&mut self, item: T) {
        let mut rng = rand::rng();
        self.add_with_rng(item, &mut rng);
    }

    /// Add an item from the stream, using a caller-supplied RNG.
    ///
    /// Draws nothing from `rng` while the reservoir is filling (or when
    /// `k == 0`). Afterwards each call draws one `f64` in `[0, 1)` and, on
    /// acceptance, one slot index in `[0, k)`.
    #[inline]
    pub fn add_with_rng<R: Rng + ?Sized>(&mut self, item: T, rng: &mut R) {
        self.seen += 1;

        // No slots: nothing to fill and k / i must not be formed.
        if self.k == 0 {
            return;
        }

        if self.samples.len() < self.k {
            self.samples.push(item);
            return;
        }

        let accept = self.k as f64 / self.seen as f64;
        if rng.random::<f64>() < accept {
            let slot = rng.random_range(0..self.k);
            self.samples[slot] = item;
        }
    }

    /// Get the current sample (size ≤ k).
    ///
    /// While `seen() <= k` this is the stream so far, in arrival order.
    /// Past that point slot order carries no meaning.
    pub fn samples(&self) -> &[T] {
        &self.samples
    }

    /// Consume the reservoir and return the sample.
    pub fn into_samples(self) -> Vec<T> {
        self.samples
    }

    /// Number of items observed so far.
    pub fn seen(&self) -> u64 {
        self.seen
    }

    /// Maximum sample size `k`.
    pub fn capacity(&self) -> usize {
        self.k
    }

    /// Current sample size.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// True once `k` items have been retained. Always true for `k == 0`.
    pub fn is_full(&self) -> bool {
        self.samples.len() >= self.k
    }

    /// Probability that any given item seen so far is in the current sample.
    ///
    /// `min(1, k / seen)`, or `0.0` before the first item and when `k == 0`.
    pub fn inclusion_probability(&self) -> f64 {
        if self.seen == 0 || self.k == 0 {
            0.0
        } else {
            (self.k as f64 / self.seen as f64).min(1.0)
        }
    }
}

/// Sample at most `k` items from `stream` using the thread-local RNG.
///
/// Consumes the whole stream before returning; an unbounded stream must be
/// bounded by the caller (`take`, closing a channel, ...).
pub fn sample<I>(k: usize, stream: I) -> Vec<I::Item>
where
    I: IntoIterator,
{
    let mut rng = rand::rng();
    sample_with_rng(k, stream, &mut rng)
}

/// [`sample`] with a caller-supplied RNG (for tests/benchmarks).
pub fn sample_with_rng<I, R>(k: usize, stream: I, rng: &mut R) -> Vec<I::Item>
where
    I: IntoIterator,
    R: Rng + ?Sized,
{
    let mut reservoir = Reservoir::new(k);
    for item in stream {
        reservoir.add_with_rng(item, rng);
    }

    tracing::debug!(
        k,
        seen = reservoir.seen(),
        retained = reservoir.len(),
        "reservoir sampling finished"
    );
    reservoir.into_samples()
}

/// Sample from a fallible stream.
///
/// The first `Err` from the stream is returned unchanged and the partial
/// reservoir is dropped; nothing after the failing element is consumed.
pub fn try_sample_with_rng<I, T, E, R>(k: usize, stream: I, rng: &mut R) -> Result<Vec<T>, E>
where
    I: IntoIterator<Item = Result<T, E>>,
    R: Rng + ?Sized,
{
    let mut reservoir = Reservoir::new(k);
    for item in stream {
        match item {
            Ok(item) => reservoir.add_with_rng(item, rng),
            Err(err) => {
                tracing::debug!(
                    k,
                    seen = reservoir.seen(),
                    "stream failed, discarding partial reservoir"
                );
                return Err(err);
            }
        }
    }

    tracing::debug!(
        k,
        seen = reservoir.seen(),
        retained = reservoir.len(),
        "reservoir sampling finished"
    );
    Ok(reservoir.into_samples())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Fails the test if any randomness is requested.
    struct NoRandomness;

    impl RngCore for NoRandomness {
        fn next_u32(&mut self) -> u32 {
            panic!("unexpected draw (u32)")
        }

        fn next_u64(&mut self) -> u64 {
            panic!("unexpected draw (u64)")
        }

        fn fill_bytes(&mut self, _dst: &mut [u8]) {
            panic!("unexpected draw (bytes)")
        }
    }

    #[test]
    fn reservoir_keeps_k_items() {
        let mut s = Reservoir::new(5);
        for i in 0..100 {
            s.add(i);
        }
        assert_eq!(s.samples().len(), 5);
        assert_eq!(s.seen(), 100);
        assert!(s.is_full());
    }

    #[test]
    fn underfilled_reservoir_is_the_stream_in_order() {
        let mut s = Reservoir::new(10);
        for i in 0..5 {
            s.add_with_rng(i, &mut NoRandomness);
        }
        assert_eq!(s.samples(), &[0, 1, 2, 3, 4]);
        assert!(!s.is_full());
    }

    #[test]
    fn fill_phase_draws_no_randomness() {
        let mut s = Reservoir::new(3);
        for i in 0..3 {
            s.add_with_rng(i, &mut NoRandomness);
        }
        assert_eq!(s.into_samples(), vec![0, 1, 2]);
    }

    #[test]
    fn zero_k_discards_without_drawing() {
        let mut s = Reservoir::new(0);
        for i in 0..1_000 {
            s.add_with_rng(i, &mut NoRandomness);
        }
        assert!(s.is_empty());
        assert!(s.is_full());
        assert_eq!(s.seen(), 1_000);
        assert_eq!(s.inclusion_probability(), 0.0);
    }

    #[test]
    fn zero_k_empty_stream() {
        let out: Vec<u8> = sample_with_rng(0, std::iter::empty(), &mut NoRandomness);
        assert!(out.is_empty());
    }

    #[test]
    fn huge_k_does_not_preallocate() {
        let s: Reservoir<u64> = Reservoir::new(usize::MAX);
        assert!(s.samples.capacity() <= MAX_PREALLOC);
        assert_eq!(s.capacity(), usize::MAX);
    }

    #[test]
    fn inclusion_probability_tracks_k_over_seen() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut s = Reservoir::new(4);
        assert_eq!(s.inclusion_probability(), 0.0);
        for i in 0..2 {
            s.add_with_rng(i, &mut rng);
        }
        assert_eq!(s.inclusion_probability(), 1.0);
        for i in 2..16 {
            s.add_with_rng(i, &mut rng);
        }
        assert!((s.inclusion_probability() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn same_seed_same_sample() {
        let a = sample_with_rng(5, 0..1_000, &mut ChaCha8Rng::seed_from_u64(42));
        let b = sample_with_rng(5, 0..1_000, &mut ChaCha8Rng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn try_sample_returns_upstream_error() {
        let stream = vec![Ok(1), Ok(2), Err("producer died"), Ok(4)];
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = try_sample_with_rng(1, stream, &mut rng).expect_err("error propagated");
        assert_eq!(err, "producer died");
    }

    #[test]
    fn try_sample_stops_at_first_error() {
        let mut pulled = 0;
        let stream = (0..10).map(|i| {
            pulled += 1;
            if i == 3 {
                Err(i)
            } else {
                Ok(i)
            }
        });
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(try_sample_with_rng(2, stream, &mut rng), Err(3));
        assert_eq!(pulled, 4);
    }

    #[test]
    fn try_sample_ok_stream() {
        let stream = (0..3).map(Ok::<_, ()>);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(try_sample_with_rng(5, stream, &mut rng), Ok(vec![0, 1, 2]));
    }

    #[test]
    fn reservoir_distribution_uniform() {
        // Deterministic chi-squared smoke test for "looks roughly uniform".
        let n = 100;
        let k = 10;
        let trials = 5_000;
        let mut counts = vec![0; n];

        for t in 0..trials {
            let mut rng = ChaCha8Rng::seed_from_u64(t as u64);
            for item in sample_with_rng(k, 0..n, &mut rng) {
                counts[item] += 1;
            }
        }

        let expected = trials as f64 * (k as f64 / n as f64);
        let chi2: f64 = counts
            .iter()
            .map(|&c| {
                let diff = c as f64 - expected;
                (diff * diff) / expected
            })
            .sum();

        // df = 99; E[chi2] ~ 99, sd ~ 14.
        assert!(
            chi2 < 250.0,
            "chi2 too large (chi2={chi2:.2}, expected~{}). counts={counts:?}",
            n - 1
        );
    }
}
