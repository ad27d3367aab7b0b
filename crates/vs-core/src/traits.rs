use crate::clip::FeatureTensor;

/// Mappe un tenseur de features vers une probabilité scalaire.
///
/// Implémenté par : `OnnxClassifier` (vs-model), stubs de test.
/// Le classifieur est opaque — l'appelant ne connaît que le contrat
/// forme d'entrée → probabilité [0, 1].
///
/// # Example
/// ```
/// use vs_core::traits::VoiceClassifier;
/// use vs_core::clip::FeatureTensor;
///
/// struct DummyClassifier;
/// impl VoiceClassifier for DummyClassifier {
///     fn predict(&self, _features: &FeatureTensor) -> anyhow::Result<f32> { Ok(0.0) }
/// }
/// ```
pub trait VoiceClassifier {
    /// Retourne la probabilité de détection [0, 1] pour le tenseur donné.
    ///
    /// # Errors
    /// Retourne une erreur si l'inférence échoue ou si la sortie du modèle
    /// est inexploitable.
    fn predict(&self, features: &FeatureTensor) -> anyhow::Result<f32>;
}
