//! Error taxonomy for the mixing engine and its collaborators.
//!
//! Every failure here is deterministic given the same inputs, so the batch
//! driver aborts on the first error instead of skipping and continuing - a
//! rate mismatch or a bad scheme means the batch is misconfigured.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NoisemixError {
    /// Clean and noise waveforms must share a sample rate; no silent resample.
    #[error("sample rate mismatch: clean is {clean} Hz but noise is {noise} Hz")]
    SampleRateMismatch { clean: u32, noise: u32 },

    /// Noise position scheme name not recognized at the parse boundary.
    #[error("unknown noise position scheme: {0} (expected repeat_noise or sample_noise)")]
    UnsupportedScheme(String),

    /// Directory listing only supports depth 1 (dir/*.wav) and 2 (dir/*/*.wav).
    #[error("unsupported directory depth: {0}")]
    UnsupportedDepth(usize),

    #[error("failed to decode {}: {source}", path.display())]
    DecodeError { path: PathBuf, source: hound::Error },

    #[error("failed to write {}: {source}", path.display())]
    EncodeError { path: PathBuf, source: hound::Error },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
