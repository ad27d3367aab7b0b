/// Fréquence d'échantillonnage imposée par le modèle pré-entraîné (Hz).
pub const SAMPLE_RATE: u32 = 22_050;

/// Durée fixe d'une capture (secondes).
pub const CLIP_SECS: u32 = 3;

/// Longueur exacte d'un clip complet : 22050 Hz × 3 s.
pub const CLIP_SAMPLES: usize = 66_150;

/// Nombre de bandes mel du spectrogramme.
pub const N_MELS: usize = 43;

/// Nombre de frames temporelles attendu par le classifieur.
pub const TARGET_FRAMES: usize = 232;

/// Clip vocal mono, amplitudes normalisées [-1, 1].
///
/// Créé par la capture, consommé par l'extraction de features, l'export WAV
/// et l'affichage de la forme d'onde. Jamais conservé au-delà d'un cycle
/// (sauf comme dernière forme d'onde affichée, remplacée à chaque cycle).
///
/// # Example
/// ```
/// use vs_core::clip::{VoiceClip, SAMPLE_RATE};
/// let clip = VoiceClip::new(vec![0.5, -0.5], SAMPLE_RATE);
/// assert!((clip.peak() - 0.5).abs() < f32::EPSILON);
/// ```
#[derive(Clone, Debug)]
pub struct VoiceClip {
    /// Échantillons mono, f32, dans [-1, 1].
    pub samples: Vec<f32>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl VoiceClip {
    /// Crée un clip à partir d'échantillons déjà normalisés.
    #[must_use]
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Amplitude absolue maximale du clip.
    ///
    /// # Example
    /// ```
    /// use vs_core::clip::VoiceClip;
    /// let clip = VoiceClip::new(vec![0.1, -0.8, 0.3], 22050);
    /// assert!((clip.peak() - 0.8).abs() < f32::EPSILON);
    /// ```
    #[must_use]
    pub fn peak(&self) -> f32 {
        self.samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max)
    }

    /// RMS (Root Mean Square) du clip — proxy de sonie pour le mode de secours.
    ///
    /// # Example
    /// ```
    /// use vs_core::clip::VoiceClip;
    /// let clip = VoiceClip::new(vec![0.02; 100], 22050);
    /// assert!((clip.rms() - 0.02).abs() < 1e-6);
    /// ```
    #[must_use]
    pub fn rms(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sum_sq: f32 = self.samples.iter().map(|s| s * s).sum();
        (sum_sq / self.samples.len() as f32).sqrt()
    }

    /// Durée du clip en secondes.
    #[must_use]
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Spectrogramme mel en dB, forme fixe bandes × frames.
///
/// Layout row-major `[bande][frame]`, interprété par le classifieur comme un
/// tenseur `[1, bandes, frames, 1]` (batch, bandes, frames, canaux).
///
/// # Example
/// ```
/// use vs_core::clip::FeatureTensor;
/// let t = FeatureTensor::zeros(43, 232);
/// assert_eq!(t.shape(), [1, 43, 232, 1]);
/// assert_eq!(t.as_slice().len(), 43 * 232);
/// ```
#[derive(Clone, Debug)]
pub struct FeatureTensor {
    data: Vec<f32>,
    n_mels: usize,
    n_frames: usize,
}

impl FeatureTensor {
    /// Tenseur rempli de zéros aux dimensions données.
    #[must_use]
    pub fn zeros(n_mels: usize, n_frames: usize) -> Self {
        Self {
            data: vec![0.0; n_mels * n_frames],
            n_mels,
            n_frames,
        }
    }

    /// Construit un tenseur depuis un buffer `[bande][frame]` row-major.
    ///
    /// Retourne `None` si la longueur ne correspond pas aux dimensions.
    #[must_use]
    pub fn from_data(data: Vec<f32>, n_mels: usize, n_frames: usize) -> Option<Self> {
        if data.len() != n_mels * n_frames {
            return None;
        }
        Some(Self {
            data,
            n_mels,
            n_frames,
        })
    }

    /// Forme logique attendue par le classifieur : `[1, bandes, frames, 1]`.
    #[must_use]
    pub fn shape(&self) -> [usize; 4] {
        [1, self.n_mels, self.n_frames, 1]
    }

    /// Accès à la valeur (bande, frame).
    #[inline]
    #[must_use]
    pub fn get(&self, mel: usize, frame: usize) -> f32 {
        self.data[mel * self.n_frames + frame]
    }

    /// Écrit la valeur (bande, frame).
    #[inline]
    pub fn set(&mut self, mel: usize, frame: usize, value: f32) {
        self.data[mel * self.n_frames + frame] = value;
    }

    /// Données brutes row-major `[bande][frame]`.
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

/// Verdict catégoriel d'un cycle de dépistage.
///
/// # Example
/// ```
/// use vs_core::clip::Outcome;
/// assert_eq!(Outcome::Detected.label(), "Parkinson Detected");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Probabilité sous le seuil de détection.
    Healthy,
    /// Probabilité au-dessus du seuil de détection.
    Detected,
    /// Classifieur indisponible et inférence impossible.
    ModelMissing,
}

impl Outcome {
    /// Libellé affiché et prononcé. Chaînes exactes du protocole d'affichage.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Healthy => "Healthy",
            Outcome::Detected => "Parkinson Detected",
            Outcome::ModelMissing => "Model not loaded",
        }
    }
}

/// Résultat d'un cycle : verdict + confiance optionnelle du classifieur.
///
/// Produit une fois par capture, affiché immédiatement, jamais persisté.
#[derive(Clone, Debug, PartialEq)]
pub struct Prediction {
    /// Verdict catégoriel.
    pub outcome: Outcome,
    /// Probabilité brute du classifieur [0, 1]. `None` en mode de secours.
    pub confidence: Option<f32>,
}

impl Prediction {
    /// Confiance formatée en pourcentage, ex. `"90.00%"`.
    ///
    /// # Example
    /// ```
    /// use vs_core::clip::{Outcome, Prediction};
    /// let p = Prediction { outcome: Outcome::Detected, confidence: Some(0.9) };
    /// assert_eq!(p.confidence_label().as_deref(), Some("90.00%"));
    /// ```
    #[must_use]
    pub fn confidence_label(&self) -> Option<String> {
        self.confidence.map(|c| format!("{:.2}%", c * 100.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_constants_are_consistent() {
        assert_eq!(CLIP_SAMPLES, (SAMPLE_RATE * CLIP_SECS) as usize);
    }

    #[test]
    fn peak_of_empty_clip_is_zero() {
        let clip = VoiceClip::new(Vec::new(), SAMPLE_RATE);
        assert_eq!(clip.peak(), 0.0);
        assert_eq!(clip.rms(), 0.0);
    }

    #[test]
    fn rms_of_constant_signal() {
        let clip = VoiceClip::new(vec![-0.5; 1000], SAMPLE_RATE);
        assert!((clip.rms() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn duration_matches_sample_count() {
        let clip = VoiceClip::new(vec![0.0; CLIP_SAMPLES], SAMPLE_RATE);
        assert!((clip.duration_secs() - CLIP_SECS as f32).abs() < 1e-6);
    }

    #[test]
    fn tensor_from_data_rejects_bad_length() {
        assert!(FeatureTensor::from_data(vec![0.0; 10], 43, 232).is_none());
        assert!(FeatureTensor::from_data(vec![0.0; 43 * 232], 43, 232).is_some());
    }

    #[test]
    fn tensor_get_set_roundtrip() {
        let mut t = FeatureTensor::zeros(4, 8);
        t.set(2, 5, -3.5);
        assert_eq!(t.get(2, 5), -3.5);
        assert_eq!(t.get(0, 0), 0.0);
    }

    #[test]
    fn outcome_labels_are_exact() {
        assert_eq!(Outcome::Healthy.label(), "Healthy");
        assert_eq!(Outcome::Detected.label(), "Parkinson Detected");
        assert_eq!(Outcome::ModelMissing.label(), "Model not loaded");
    }

    #[test]
    fn confidence_label_formats_two_decimals() {
        let p = Prediction {
            outcome: Outcome::Healthy,
            confidence: Some(0.123_456),
        };
        assert_eq!(p.confidence_label().as_deref(), Some("12.35%"));
        let none = Prediction {
            outcome: Outcome::Healthy,
            confidence: None,
        };
        assert!(none.confidence_label().is_none());
    }
}
