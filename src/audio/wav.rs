//! WAV file reading and writing over hound.
//!
//! Reads arbitrary bit-depth PCM or float WAVs into normalized f32 waveforms
//! and writes 16-bit PCM. Float-to-PCM conversion is a plain scale-and-cast
//! with no dithering; values outside [-1, 1] saturate at the i16 bounds, so
//! callers wanting headroom must pre-clip.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::debug;

use crate::audio::waveform::Waveform;
use crate::config::MAX_INT16;
use crate::error::NoisemixError;

/// Decode a WAV file into a waveform with one explicit channel per column.
pub fn read_audio(path: &Path) -> Result<Waveform, NoisemixError> {
    let decode_err = |source| NoisemixError::DecodeError {
        path: path.to_path_buf(),
        source,
    };

    let reader = WavReader::open(path).map_err(decode_err)?;
    let spec = reader.spec();
    let channels = spec.channels as usize;

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(decode_err)?,
        SampleFormat::Int => {
            // Normalize by the full magnitude of the source bit depth so
            // i16::MIN maps to exactly -1.0.
            let max = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max))
                .collect::<Result<_, _>>()
                .map_err(decode_err)?
        }
    };

    debug!(
        "read {}: {} frames, {} ch, {} Hz",
        path.display(),
        samples.len() / channels.max(1),
        channels,
        spec.sample_rate
    );
    Ok(Waveform::from_interleaved(samples, channels, spec.sample_rate))
}

/// Write a waveform as 16-bit PCM.
pub fn write_audio(wav: &Waveform, path: &Path) -> Result<(), NoisemixError> {
    let encode_err = |source| NoisemixError::EncodeError {
        path: path.to_path_buf(),
        source,
    };

    let spec = WavSpec {
        channels: wav.n_channels() as u16,
        sample_rate: wav.sample_rate(),
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).map_err(encode_err)?;
    // Row-major iteration over (n_samples, n_channels) is interleaved order.
    for &sample in wav.data().iter() {
        writer
            .write_sample((sample * MAX_INT16) as i16)
            .map_err(encode_err)?;
    }
    writer.finalize().map_err(encode_err)?;
    Ok(())
}
