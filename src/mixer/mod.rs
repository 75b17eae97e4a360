//! Noise mixing engine.
//!
//! Scales a noise waveform so that summing it with a clean waveform hits a
//! requested SNR, positions the noise to cover exactly the clean signal's
//! length, and returns the sum. Pure and stateless: all randomness comes
//! from the generator handed in by the caller, so a fixed seed reproduces
//! output bit for bit.
//!
//! No clipping or limiting happens here. The mix may exceed [-1, 1]; the
//! 16-bit quantization downstream saturates, and callers who care pre-clip.

use std::fmt;
use std::str::FromStr;

use log::debug;
use ndarray::{s, Array2};
use rand::Rng;

use crate::audio::waveform::Waveform;
use crate::error::NoisemixError;

/// How a noise waveform shorter or longer than the clean waveform is turned
/// into a segment of exactly the clean signal's length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementScheme {
    /// Tile the noise end-to-end until long enough, then crop a random window.
    RepeatTile,
    /// Place the noise once at a random position, zero-padding or cropping.
    RandomSample,
}

impl PlacementScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlacementScheme::RepeatTile => "repeat_noise",
            PlacementScheme::RandomSample => "sample_noise",
        }
    }
}

impl fmt::Display for PlacementScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlacementScheme {
    type Err = NoisemixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "repeat_noise" => Ok(PlacementScheme::RepeatTile),
            "sample_noise" => Ok(PlacementScheme::RandomSample),
            other => Err(NoisemixError::UnsupportedScheme(other.to_string())),
        }
    }
}

/// Population mean of squared samples over all samples and channels.
fn mean_power(samples: &Array2<f32>) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f64 = samples.iter().map(|&x| x as f64 * x as f64).sum();
    sum / samples.len() as f64
}

/// The scalar that, multiplying the noise, makes
/// `10 * log10(P_clean / P_noise_scaled) == snr_db`.
///
/// Deterministic: no dependency on any random source. The epsilon term keeps
/// the division finite when the noise is pure silence.
pub fn compute_weight(clean: &Array2<f32>, noise: &Array2<f32>, snr_db: f32) -> f32 {
    let clean_power = mean_power(clean);
    let noise_power = mean_power(noise);
    let scale =
        (10f64.powf(-f64::from(snr_db) / 10.0) * clean_power / (noise_power + f64::EPSILON)).sqrt();
    scale as f32
}

/// Tile the noise along the time axis until at least `required` samples, then
/// crop a window of exactly `required` samples at a random offset (offset 0
/// when the tiled length matches exactly).
fn repeat_noise(noise: &Array2<f32>, required: usize, rng: &mut impl Rng) -> Array2<f32> {
    let n_sample = noise.nrows();

    let tiled_storage;
    let tiled = if n_sample < required {
        let repeats = required.div_ceil(n_sample);
        let mut t = Array2::zeros((repeats * n_sample, noise.ncols()));
        for r in 0..repeats {
            t.slice_mut(s![r * n_sample..(r + 1) * n_sample, ..]).assign(noise);
        }
        tiled_storage = t;
        tiled_storage.view()
    } else {
        noise.view()
    };

    let n_sample = tiled.nrows();
    let start = if n_sample == required {
        0
    } else {
        rng.gen_range(0..n_sample - required)
    };
    tiled.slice(s![start..start + required, ..]).to_owned()
}

/// Place the noise once inside a buffer of `required` samples: zero-padded at
/// a random position when shorter, cropped at a random offset when longer.
///
/// The exact-length case collapses the offset range to a single point; the
/// offset is 0 then, and the empty range never reaches the RNG (rand's
/// `gen_range` rejects empty ranges).
fn sample_noise(noise: &Array2<f32>, required: usize, rng: &mut impl Rng) -> Array2<f32> {
    let (n_sample, n_channel) = noise.dim();

    if n_sample <= required {
        let n_extra = required - n_sample;
        let start = if n_extra == 0 { 0 } else { rng.gen_range(0..n_extra) };
        let mut sampled = Array2::zeros((required, n_channel));
        sampled
            .slice_mut(s![start..start + n_sample, ..])
            .assign(noise);
        sampled
    } else {
        let n_extra = n_sample - required;
        let start = rng.gen_range(0..n_extra);
        noise.slice(s![start..start + required, ..]).to_owned()
    }
}

/// Mix a clean waveform with a noise waveform at `snr_db`.
///
/// Preconditions: matching sample rates (no silent resample) and non-empty
/// clean and noise signals. The whole noise waveform is scaled before any length
/// adjustment, so tiled copies all carry the same scale. The result has the
/// clean signal's shape and rate.
pub fn mix(
    clean: &Waveform,
    noise: &Waveform,
    snr_db: f32,
    scheme: PlacementScheme,
    rng: &mut impl Rng,
) -> Result<Waveform, NoisemixError> {
    if clean.sample_rate() != noise.sample_rate() {
        return Err(NoisemixError::SampleRateMismatch {
            clean: clean.sample_rate(),
            noise: noise.sample_rate(),
        });
    }

    let scale = compute_weight(clean.data(), noise.data(), snr_db);
    debug!(
        "mixing at {:.2} dB SNR, scheme {}, noise scale {:.6}",
        snr_db,
        scheme.as_str(),
        scale
    );

    let noise_scaled = noise.data() * scale;
    let required = clean.n_samples();
    let segment = match scheme {
        PlacementScheme::RepeatTile => repeat_noise(&noise_scaled, required, rng),
        PlacementScheme::RandomSample => sample_noise(&noise_scaled, required, rng),
    };

    let distorted = clean.data() + &segment;
    Ok(Waveform::new(distorted, clean.sample_rate()))
}
