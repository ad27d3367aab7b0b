use std::path::PathBuf;

use thiserror::Error;

/// Errors originating from the model module.
#[derive(Error, Debug)]
pub enum ModelError {
    /// Model file not found on disk.
    #[error("Modèle introuvable : {path}")]
    NotFound {
        /// Path that was probed.
        path: PathBuf,
    },

    /// ONNX Runtime failed to load or run the model.
    #[error("Erreur ONNX Runtime : {0}")]
    Runtime(String),
}
