//! Shared constants for the data preparation tools.

/// Largest i16 magnitude, used for float <-> PCM conversion.
pub const MAX_INT16: f32 = i16::MAX as f32;

/// Target sample rate of the prepared corpus.
pub const DEFAULT_SAMPLE_RATE: u32 = 16_000;

/// Default SNR range in dB for the add-noise driver.
pub const DEFAULT_SNR_RANGE: [f32; 2] = [-5.0, 20.0];

/// How many mixed pairs between progress log lines.
pub const PROGRESS_INTERVAL: u64 = 100;
