//! Classifieur ONNX : session ort sur le modèle pré-entraîné, entrée
//! `[1, n_mels, n_frames, 1]`, sortie scalaire (probabilité).

use std::path::Path;

use anyhow::Context;
use ndarray::Array4;
use ort::session::Session;
use ort::value::Tensor;

use vs_core::clip::FeatureTensor;
use vs_core::traits::VoiceClassifier;

use crate::error::ModelError;

/// Classifieur vocal adossé à une session ONNX Runtime.
pub struct OnnxClassifier {
    session: Session,
}

impl OnnxClassifier {
    /// Charge le modèle depuis un fichier `.onnx`.
    ///
    /// # Errors
    /// Retourne une erreur si le fichier n'existe pas ou si ONNX Runtime
    /// ne parvient pas à construire la session.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        if !path.exists() {
            return Err(ModelError::NotFound {
                path: path.to_path_buf(),
            });
        }

        ort::init()
            .with_name("voicescreen")
            .commit()
            .map_err(|e| ModelError::Runtime(e.to_string()))?;

        let session = Session::builder()
            .map_err(|e| ModelError::Runtime(e.to_string()))?
            .commit_from_file(path)
            .map_err(|e| ModelError::Runtime(e.to_string()))?;

        log::info!("Modèle chargé : {}", path.display());
        Ok(Self { session })
    }
}

impl VoiceClassifier for OnnxClassifier {
    fn predict(&self, features: &FeatureTensor) -> anyhow::Result<f32> {
        let [b, m, t, c] = features.shape();
        let array = Array4::from_shape_vec((b, m, t, c), features.as_slice().to_vec())
            .context("Construction du tenseur d'entrée")?;

        let input = Tensor::from_array(array).context("Création de l'entrée ONNX")?;

        let outputs = self
            .session
            .run(ort::inputs![input].context("Création de l'entrée ONNX")?)
            .context("Inférence ONNX")?;

        let output_name = self
            .session
            .outputs
            .first()
            .map(|o| o.name.as_str())
            .context("Sortie ONNX absente")?;

        let tensor = outputs
            .get(output_name)
            .context("Sortie ONNX absente")?
            .try_extract_tensor::<f32>()
            .context("Extraction de la sortie ONNX")?;

        let prob = tensor
            .iter()
            .next()
            .copied()
            .context("Sortie ONNX vide")?;

        Ok(prob.clamp(0.0, 1.0))
    }
}
