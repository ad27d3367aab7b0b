//! Classifieur vocal ONNX et politique de décision pour voicescreen.
//!
//! Chargement du modèle pré-entraîné via ort (soft-fail : l'absence du
//! modèle bascule en mode dégradé, jamais en panique), inférence sur le
//! tenseur log-mel, seuillage du résultat.

pub mod decision;
pub mod error;
pub mod handle;
pub mod onnx;

pub use decision::{decide, decide_by_loudness, screen};
pub use error::ModelError;
pub use handle::ModelHandle;
pub use onnx::OnnxClassifier;
