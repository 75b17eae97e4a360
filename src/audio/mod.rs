// src/audio/mod.rs
pub mod resample;
pub mod wav;
pub mod waveform;

pub use wav::{read_audio, write_audio};
pub use waveform::Waveform;
