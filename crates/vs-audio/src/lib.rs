//! Audio capture, feature extraction, and WAV export for voicescreen.
//!
//! Capture via cpal (buffer circulaire lock-free), STFT via realfft,
//! banc de filtres mel + échelle dB, export PCM 16 bits via hound.

pub mod capture;
pub mod error;
pub mod fft;
pub mod level;
pub mod mel;
pub mod wav;

pub use capture::{finalize_recording, Recorder};
pub use error::AudioError;
pub use mel::MelExtractor;
