//! Errors for sampler construction.

use thiserror::Error;

/// Invalid arguments rejected before any stream element is consumed.
///
/// Failures of the stream itself are not represented here: the fallible
/// entry points hand the stream's own error back unchanged.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleError {
    /// `k` was negative.
    #[error("sample size must be >= 0 (got {0})")]
    NegativeSampleSize(i64),
    /// `k` does not fit in `usize` on this target.
    #[error("sample size {0} does not fit in usize")]
    SampleSizeOverflow(i64),
}

pub type Result<T> = std::result::Result<T, SampleError>;
