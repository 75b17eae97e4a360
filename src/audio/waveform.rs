//! Waveform - a rectangular block of audio samples plus its sample rate.

use ndarray::Array2;

/// A decoded audio signal with shape `(n_samples, n_channels)`.
///
/// Channel-count normalization happens at the construction boundary: a mono
/// signal is always `(n, 1)`, never a bare 1-D sequence, so the mixing engine
/// can assume rectangular shapes throughout.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    data: Array2<f32>,
    sample_rate: u32,
}

impl Waveform {
    pub fn new(data: Array2<f32>, sample_rate: u32) -> Self {
        Self { data, sample_rate }
    }

    /// Wrap a flat sequence of samples as a single explicit channel.
    pub fn from_mono(samples: Vec<f32>, sample_rate: u32) -> Self {
        let n = samples.len();
        let data = Array2::from_shape_vec((n, 1), samples)
            .expect("(n, 1) shape matches sample count");
        Self { data, sample_rate }
    }

    /// Build a waveform from interleaved samples as decoders produce them.
    /// A trailing partial frame (truncated file) is dropped.
    pub fn from_interleaved(mut samples: Vec<f32>, channels: usize, sample_rate: u32) -> Self {
        let channels = channels.max(1);
        let frames = samples.len() / channels;
        samples.truncate(frames * channels);
        let data = Array2::from_shape_vec((frames, channels), samples)
            .expect("(frames, channels) shape matches truncated sample count");
        Self { data, sample_rate }
    }

    pub fn data(&self) -> &Array2<f32> {
        &self.data
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn n_samples(&self) -> usize {
        self.data.nrows()
    }

    pub fn n_channels(&self) -> usize {
        self.data.ncols()
    }

    pub fn duration_secs(&self) -> f32 {
        self.n_samples() as f32 / self.sample_rate as f32
    }
}
