//! `strom`: uniform reservoir sampling over streams.
//!
//! Picks a uniform random subset of at most `k` items from a stream of unknown
//! (possibly unbounded) length, in a single pass and O(k) memory.
//!
//! Exposed modules:
//! - `reservoir`: the Algorithm R core ([`Reservoir`]) and one-shot `sample*` functions.
//! - `sampler`: [`Sampler`] (size + optional seed) and the [`ReservoirSampleExt`] iterator extension.
//! - `error`: argument errors.
//!
//! Streams are anything `IntoIterator`. A channel is just its receiver:
//!
//! ```
//! use std::sync::mpsc;
//! use std::thread;
//!
//! let (tx, rx) = mpsc::channel();
//! let producer = thread::spawn(move || {
//!     for i in [1, 2, 3] {
//!         tx.send(i).unwrap();
//!     }
//! });
//!
//! // One of [1], [2] or [3].
//! let picked = strom::sample(1, rx);
//! assert_eq!(picked.len(), 1);
//! producer.join().unwrap();
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod reservoir;
pub mod sampler;

pub use error::{Result, SampleError};
pub use reservoir::{sample, sample_with_rng, try_sample_with_rng, Reservoir};
pub use sampler::{ReservoirSampleExt, Sampler};
