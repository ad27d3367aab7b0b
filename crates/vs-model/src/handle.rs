//! Disponibilité du classifieur : variante taguée plutôt que test de
//! nullité, le pipeline dispatche sur le tag.

use std::path::Path;

use log::warn;

use vs_core::traits::VoiceClassifier;

use crate::onnx::OnnxClassifier;

/// État du classifieur pour toute la durée du processus.
///
/// Le chargement est tenté une seule fois au démarrage ; un échec
/// bascule en [`ModelHandle::Missing`] et le dépistage continue en mode
/// dégradé (décision par intensité sonore), sans nouvelle tentative.
pub enum ModelHandle {
    /// Classifieur opérationnel.
    Loaded(Box<dyn VoiceClassifier>),
    /// Modèle absent ou invalide ; mode dégradé.
    Missing,
}

impl ModelHandle {
    /// Tente de charger le modèle ; ne retourne jamais d'erreur.
    ///
    /// # Example
    /// ```
    /// use std::path::Path;
    /// use vs_model::ModelHandle;
    /// let handle = ModelHandle::load(Path::new("/nonexistent/model.onnx"));
    /// assert!(!handle.is_loaded());
    /// ```
    #[must_use]
    pub fn load(path: &Path) -> Self {
        match OnnxClassifier::load(path) {
            Ok(clf) => Self::Loaded(Box::new(clf)),
            Err(e) => {
                warn!("Chargement du modèle échoué ({e}), mode dégradé activé");
                Self::Missing
            }
        }
    }

    /// Whether a classifier is available.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_missing_handle() {
        let handle = ModelHandle::load(Path::new("does/not/exist.onnx"));
        assert!(!handle.is_loaded());
    }
}
