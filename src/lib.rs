//! noisemix - noisy speech synthesis at controlled SNRs.
//!
//! Prepares training data for speech enhancement / recognition by mixing
//! clean speech with noise recordings at a requested signal-to-noise ratio.
//! The core is a pure, seeded mixing engine ([`mixer`]); around it sit WAV
//! file I/O, corpus discovery, and a parallel batch driver.

pub mod audio;
pub mod config;
pub mod error;
pub mod files;
pub mod mixer;
pub mod pipeline;

pub use audio::wav::{read_audio, write_audio};
pub use audio::waveform::Waveform;
pub use error::NoisemixError;
pub use mixer::{compute_weight, mix, PlacementScheme};
