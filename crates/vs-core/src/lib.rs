//! Configuration, types, and shared structures for voicescreen.
//!
//! This crate contains all shared types, traits, and configuration logic
//! used across the voicescreen workspace.

pub mod clip;
pub mod config;
pub mod error;
pub mod traits;

pub use clip::{FeatureTensor, Outcome, Prediction, VoiceClip};
pub use config::ScreeningConfig;
pub use error::CoreError;
pub use traits::VoiceClassifier;
