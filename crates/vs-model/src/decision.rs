//! Politique de décision : seuillage de la probabilité du modèle, et
//! repli sur l'intensité sonore quand le modèle est absent.

use log::{debug, error};

use vs_core::clip::{FeatureTensor, Outcome, Prediction};
use vs_core::config::ScreeningConfig;

use crate::handle::ModelHandle;

/// Seuillage de la probabilité du classifieur.
///
/// Le seuil est strict : une probabilité exactement égale au seuil est
/// classée saine. Constante héritée du modèle d'origine, non calibrée.
///
/// # Example
/// ```
/// use vs_model::decision::decide;
/// use vs_core::clip::Outcome;
/// assert_eq!(decide(0.4, 0.4), Outcome::Healthy);
/// assert_eq!(decide(0.40001, 0.4), Outcome::Detected);
/// ```
#[must_use]
pub fn decide(probability: f32, threshold: f32) -> Outcome {
    if probability > threshold {
        Outcome::Detected
    } else {
        Outcome::Healthy
    }
}

/// Décision de repli par intensité sonore (modèle absent).
///
/// Une voix franche (RMS strictement supérieur au seuil) est classée
/// saine, une voix faible est signalée. Heuristique grossière, assumée
/// comme telle : elle n'existe que pour que la démo reste utilisable
/// sans le fichier modèle.
#[must_use]
pub fn decide_by_loudness(rms: f32, rms_threshold: f32) -> Outcome {
    if rms > rms_threshold {
        Outcome::Healthy
    } else {
        Outcome::Detected
    }
}

/// Un cycle de décision complet : dispatch sur la disponibilité du
/// modèle.
///
/// - Modèle chargé : inférence puis seuillage ; la confiance rapportée
///   est la probabilité brute. Une inférence qui échoue est journalisée
///   et rendue comme « modèle non disponible ».
/// - Modèle absent : repli par intensité sonore, sans confiance.
#[must_use]
pub fn screen(
    handle: &ModelHandle,
    features: &FeatureTensor,
    clip_rms: f32,
    config: &ScreeningConfig,
) -> Prediction {
    match handle {
        ModelHandle::Loaded(classifier) => match classifier.predict(features) {
            Ok(p) => {
                debug!("Probabilité du modèle : {p:.4}");
                Prediction {
                    outcome: decide(p, config.detection_threshold),
                    confidence: Some(p),
                }
            }
            Err(e) => {
                error!("Inférence échouée : {e:#}");
                Prediction {
                    outcome: Outcome::ModelMissing,
                    confidence: Some(0.0),
                }
            }
        },
        ModelHandle::Missing => {
            debug!("Modèle absent, décision par RMS ({clip_rms:.4})");
            Prediction {
                outcome: decide_by_loudness(clip_rms, config.rms_healthy_threshold),
                confidence: None,
            }
        }
    }
}
