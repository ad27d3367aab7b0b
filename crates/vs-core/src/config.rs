use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::clip;

/// Configuration complète du dépistage.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine,
/// alignée sur les constantes du modèle pré-entraîné.
///
/// # Example
/// ```
/// use vs_core::config::ScreeningConfig;
/// let config = ScreeningConfig::default();
/// assert_eq!(config.sample_rate, 22050);
/// assert_eq!(config.n_mels, 43);
/// ```
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ScreeningConfig {
    // === Capture ===
    /// Fréquence d'échantillonnage (Hz). Le modèle attend 22050.
    pub sample_rate: u32,
    /// Durée fixe d'une capture (secondes).
    pub duration_secs: u32,
    /// Pic d'amplitude minimal : en dessous, le clip est rejeté comme silence.
    pub silence_peak: f32,

    // === Features ===
    /// Nombre de bandes mel.
    pub n_mels: usize,
    /// Nombre de frames temporelles (pad/troncature à droite).
    pub target_frames: usize,
    /// Fréquence haute du banc de filtres mel (Hz).
    pub fmax_hz: f32,
    /// Taille de fenêtre STFT.
    pub n_fft: usize,
    /// Pas entre deux fenêtres STFT.
    pub hop_length: usize,

    // === Décision ===
    /// Seuil de détection sur la probabilité du classifieur.
    /// Constante non calibrée héritée du modèle d'origine — à préserver.
    pub detection_threshold: f32,
    /// Seuil RMS du mode de secours (RMS > seuil ⇒ Healthy).
    /// Constante non calibrée héritée du modèle d'origine — à préserver.
    pub rms_healthy_threshold: f32,

    // === Sorties ===
    /// Chemin du modèle ONNX pré-entraîné.
    pub model_path: PathBuf,
    /// Chemin du WAV écrit à chaque capture (écrasé à chaque cycle).
    pub wav_path: PathBuf,
    /// Annoncer le verdict en synthèse vocale.
    pub speak_results: bool,
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            sample_rate: clip::SAMPLE_RATE,
            duration_secs: clip::CLIP_SECS,
            silence_peak: 0.01,
            n_mels: clip::N_MELS,
            target_frames: clip::TARGET_FRAMES,
            fmax_hz: 8000.0,
            n_fft: 2048,
            hop_length: 512,
            detection_threshold: 0.4,
            rms_healthy_threshold: 0.02,
            model_path: PathBuf::from("models/parkinson_voice.onnx"),
            wav_path: PathBuf::from("normal_voice.wav"),
            speak_results: true,
        }
    }
}

impl ScreeningConfig {
    /// Longueur exacte d'un clip complet en échantillons.
    #[must_use]
    pub fn clip_samples(&self) -> usize {
        (self.sample_rate * self.duration_secs) as usize
    }

    /// Clamp all numeric fields to their valid ranges.
    /// Called after TOML deserialization to prevent out-of-range values.
    pub fn clamp_all(&mut self) {
        self.sample_rate = self.sample_rate.clamp(8_000, 96_000);
        self.duration_secs = self.duration_secs.clamp(1, 30);
        self.silence_peak = self.silence_peak.clamp(0.0, 1.0);
        self.n_mels = self.n_mels.clamp(1, 256);
        self.target_frames = self.target_frames.clamp(1, 4096);
        let nyquist = self.sample_rate as f32 / 2.0;
        self.fmax_hz = self.fmax_hz.clamp(100.0, nyquist);
        self.n_fft = self.n_fft.clamp(64, 16_384);
        self.hop_length = self.hop_length.clamp(1, self.n_fft);
        self.detection_threshold = self.detection_threshold.clamp(0.0, 1.0);
        self.rms_healthy_threshold = self.rms_healthy_threshold.clamp(0.0, 1.0);
    }
}

/// Structure TOML intermédiaire pour désérialisation avec sections optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    capture: Option<CaptureSection>,
    features: Option<FeatureSection>,
    decision: Option<DecisionSection>,
    output: Option<OutputSection>,
}

/// Capture section of the TOML config, all fields optional for partial override.
#[derive(Deserialize)]
struct CaptureSection {
    sample_rate: Option<u32>,
    duration_secs: Option<u32>,
    silence_peak: Option<f32>,
}

/// Feature extraction section of the TOML config, all fields optional.
#[derive(Deserialize)]
struct FeatureSection {
    n_mels: Option<usize>,
    target_frames: Option<usize>,
    fmax_hz: Option<f32>,
    n_fft: Option<usize>,
    hop_length: Option<usize>,
}

/// Decision thresholds section of the TOML config, all fields optional.
#[derive(Deserialize)]
struct DecisionSection {
    detection_threshold: Option<f32>,
    rms_healthy_threshold: Option<f32>,
}

/// Output paths section of the TOML config, all fields optional.
#[derive(Deserialize)]
struct OutputSection {
    model_path: Option<PathBuf>,
    wav_path: Option<PathBuf>,
    speak_results: Option<bool>,
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use vs_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<ScreeningConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    let file: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("TOML invalide dans {}", path.display()))?;

    let mut config = ScreeningConfig::default();

    if let Some(capture) = file.capture {
        if let Some(v) = capture.sample_rate {
            config.sample_rate = v;
        }
        if let Some(v) = capture.duration_secs {
            config.duration_secs = v;
        }
        if let Some(v) = capture.silence_peak {
            config.silence_peak = v;
        }
    }
    if let Some(features) = file.features {
        if let Some(v) = features.n_mels {
            config.n_mels = v;
        }
        if let Some(v) = features.target_frames {
            config.target_frames = v;
        }
        if let Some(v) = features.fmax_hz {
            config.fmax_hz = v;
        }
        if let Some(v) = features.n_fft {
            config.n_fft = v;
        }
        if let Some(v) = features.hop_length {
            config.hop_length = v;
        }
    }
    if let Some(decision) = file.decision {
        if let Some(v) = decision.detection_threshold {
            config.detection_threshold = v;
        }
        if let Some(v) = decision.rms_healthy_threshold {
            config.rms_healthy_threshold = v;
        }
    }
    if let Some(output) = file.output {
        if let Some(v) = output.model_path {
            config.model_path = v;
        }
        if let Some(v) = output.wav_path {
            config.wav_path = v;
        }
        if let Some(v) = output.speak_results {
            config.speak_results = v;
        }
    }

    config.clamp_all();
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_matches_model_constants() {
        let config = ScreeningConfig::default();
        assert_eq!(config.clip_samples(), clip::CLIP_SAMPLES);
        assert_eq!(config.n_mels, 43);
        assert_eq!(config.target_frames, 232);
        assert!((config.detection_threshold - 0.4).abs() < f32::EPSILON);
        assert!((config.rms_healthy_threshold - 0.02).abs() < f32::EPSILON);
    }

    #[test]
    fn partial_toml_merges_over_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[decision]\ndetection_threshold = 0.55\n\n[output]\nspeak_results = false\n"
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert!((config.detection_threshold - 0.55).abs() < f32::EPSILON);
        assert!(!config.speak_results);
        // Les sections absentes gardent leurs défauts.
        assert_eq!(config.sample_rate, 22_050);
        assert_eq!(config.n_mels, 43);
    }

    #[test]
    fn clamp_limits_fmax_to_nyquist() {
        let mut config = ScreeningConfig::default();
        config.fmax_hz = 50_000.0;
        config.clamp_all();
        assert!((config.fmax_hz - 11_025.0).abs() < f32::EPSILON);
    }

    #[test]
    fn clamp_keeps_hop_below_window() {
        let mut config = ScreeningConfig::default();
        config.hop_length = 100_000;
        config.clamp_all();
        assert_eq!(config.hop_length, config.n_fft);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_config(Path::new("/nonexistent/voicescreen.toml")).is_err());
    }
}
