use thiserror::Error;

/// Errors originating from the core module.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Invalid configuration value or structure.
    #[error("Configuration invalide : {0}")]
    Config(String),

    /// Referenced file does not exist.
    #[error("Fichier introuvable : {path}")]
    FileNotFound {
        /// Path that was not found.
        path: String,
    },

    /// Feature tensor does not have the expected dimensions.
    #[error("Forme de tenseur invalide : attendu {expected_mels}×{expected_frames}, reçu {got_mels}×{got_frames}")]
    InvalidShape {
        /// Expected mel band count.
        expected_mels: usize,
        /// Expected frame count.
        expected_frames: usize,
        /// Actual mel band count.
        got_mels: usize,
        /// Actual frame count.
        got_frames: usize,
    },
}
