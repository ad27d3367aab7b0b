//! Un cycle de dépistage : mise en forme de l'enregistrement, export
//! WAV, extraction des features, décision. Pur vis-à-vis du matériel :
//! la capture micro vit dans l'App, ce module ne voit que des
//! échantillons.

use std::path::Path;

use log::warn;

use vs_audio::capture::finalize_recording;
use vs_audio::mel::MelExtractor;
use vs_audio::wav::write_clip;
use vs_core::clip::{Prediction, VoiceClip};
use vs_core::config::ScreeningConfig;
use vs_model::decision::screen;
use vs_model::ModelHandle;

/// Issue d'un cycle de dépistage.
pub enum CycleReport {
    /// Pic d'amplitude sous le seuil de silence : rien n'a été analysé.
    TooQuiet,
    /// Clip analysé et verdict rendu.
    Screened {
        /// Verdict et confiance.
        prediction: Prediction,
        /// Clip analysé, conservé pour l'affichage de la forme d'onde.
        clip: VoiceClip,
    },
}

/// Traite un enregistrement brut de bout en bout.
///
/// Le filtre de silence court-circuite tout : ni export WAV, ni
/// extraction, ni classifieur. Pour un clip retenu, l'export WAV est
/// tenté d'abord (échec journalisé, non fatal), puis le spectrogramme
/// log-mel est extrait et soumis à la décision.
pub fn process_recording(
    raw: Vec<f32>,
    sample_rate: u32,
    config: &ScreeningConfig,
    extractor: &mut MelExtractor,
    model: &ModelHandle,
    wav_path: Option<&Path>,
) -> CycleReport {
    let Some(clip) = finalize_recording(raw, sample_rate, config.silence_peak, config.clip_samples())
    else {
        return CycleReport::TooQuiet;
    };

    if let Some(path) = wav_path {
        if let Err(e) = write_clip(path, &clip) {
            warn!("Export WAV échoué : {e:#}");
        }
    }

    let features = extractor.extract(&clip);
    let prediction = screen(model, &features, clip.rms(), config);

    CycleReport::Screened { prediction, clip }
}

/// Réduit un clip en `n` seaux d'amplitude crête pour la sparkline.
///
/// # Example
/// ```
/// use vs_app::pipeline::waveform_buckets;
/// let buckets = waveform_buckets(&[0.0, 1.0, 0.5, 0.5], 2);
/// assert_eq!(buckets, vec![100, 50]);
/// ```
#[must_use]
pub fn waveform_buckets(samples: &[f32], n: usize) -> Vec<u64> {
    if n == 0 || samples.is_empty() {
        return vec![0; n];
    }
    let chunk = samples.len().div_ceil(n);
    samples
        .chunks(chunk)
        .map(|c| {
            let peak = c.iter().map(|s| s.abs()).fold(0.0f32, f32::max);
            (peak * 100.0).round() as u64
        })
        .chain(std::iter::repeat(0))
        .take(n)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vs_core::clip::{FeatureTensor, Outcome, CLIP_SAMPLES, SAMPLE_RATE};
    use vs_core::traits::VoiceClassifier;

    struct Stub(f32);

    impl VoiceClassifier for Stub {
        fn predict(&self, _features: &FeatureTensor) -> anyhow::Result<f32> {
            Ok(self.0)
        }
    }

    /// Classifieur sentinelle : le test échoue s'il est invoqué.
    struct MustNotRun;

    impl VoiceClassifier for MustNotRun {
        fn predict(&self, _features: &FeatureTensor) -> anyhow::Result<f32> {
            panic!("le classifieur ne doit pas être appelé sur un clip silencieux");
        }
    }

    fn sine(amplitude: f32) -> Vec<f32> {
        (0..CLIP_SAMPLES)
            .map(|i| {
                amplitude * (2.0 * std::f32::consts::PI * 220.0 * i as f32 / SAMPLE_RATE as f32).sin()
            })
            .collect()
    }

    #[test]
    fn voiced_clip_with_confident_model_is_detected() {
        let config = ScreeningConfig::default();
        let mut extractor = MelExtractor::new(&config);
        let model = ModelHandle::Loaded(Box::new(Stub(0.9)));

        let report = process_recording(sine(0.5), SAMPLE_RATE, &config, &mut extractor, &model, None);
        let CycleReport::Screened { prediction, clip } = report else {
            panic!("un clip sonore doit être analysé");
        };
        assert_eq!(prediction.outcome, Outcome::Detected);
        assert_eq!(prediction.outcome.label(), "Parkinson Detected");
        assert_eq!(prediction.confidence_label().as_deref(), Some("90.00%"));
        assert_eq!(clip.samples.len(), CLIP_SAMPLES);
    }

    #[test]
    fn voiced_clip_under_threshold_is_healthy() {
        let config = ScreeningConfig::default();
        let mut extractor = MelExtractor::new(&config);
        let model = ModelHandle::Loaded(Box::new(Stub(0.3)));

        let report = process_recording(sine(0.5), SAMPLE_RATE, &config, &mut extractor, &model, None);
        let CycleReport::Screened { prediction, .. } = report else {
            panic!("un clip sonore doit être analysé");
        };
        assert_eq!(prediction.outcome.label(), "Healthy");
    }

    #[test]
    fn silent_clip_short_circuits_before_the_classifier() {
        let config = ScreeningConfig::default();
        let mut extractor = MelExtractor::new(&config);
        let model = ModelHandle::Loaded(Box::new(MustNotRun));

        let report = process_recording(
            vec![0.0; CLIP_SAMPLES],
            SAMPLE_RATE,
            &config,
            &mut extractor,
            &model,
            None,
        );
        assert!(matches!(report, CycleReport::TooQuiet));
    }

    #[test]
    fn voiced_clip_is_exported_to_wav() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("clip.wav");
        let config = ScreeningConfig::default();
        let mut extractor = MelExtractor::new(&config);
        let model = ModelHandle::Missing;

        let _ = process_recording(
            sine(0.5),
            SAMPLE_RATE,
            &config,
            &mut extractor,
            &model,
            Some(&path),
        );
        assert!(path.exists());
    }

    #[test]
    fn silent_clip_is_not_exported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("clip.wav");
        let config = ScreeningConfig::default();
        let mut extractor = MelExtractor::new(&config);
        let model = ModelHandle::Missing;

        let _ = process_recording(
            vec![0.0; CLIP_SAMPLES],
            SAMPLE_RATE,
            &config,
            &mut extractor,
            &model,
            Some(&path),
        );
        assert!(!path.exists());
    }

    #[test]
    fn missing_model_uses_loudness_fallback() {
        let config = ScreeningConfig::default();
        let mut extractor = MelExtractor::new(&config);
        let model = ModelHandle::Missing;

        // Sinus 0.5 : RMS ≈ 0.35, bien au-dessus du seuil de 0.02.
        let report = process_recording(sine(0.5), SAMPLE_RATE, &config, &mut extractor, &model, None);
        let CycleReport::Screened { prediction, .. } = report else {
            panic!("un clip sonore doit être analysé");
        };
        assert_eq!(prediction.outcome, Outcome::Healthy);
        assert!(prediction.confidence.is_none());
    }

    #[test]
    fn waveform_buckets_have_requested_length() {
        let buckets = waveform_buckets(&sine(0.5), 64);
        assert_eq!(buckets.len(), 64);
        assert!(buckets.iter().any(|&b| b > 0));
    }

    #[test]
    fn waveform_buckets_pad_short_input() {
        let buckets = waveform_buckets(&[1.0], 4);
        assert_eq!(buckets.len(), 4);
        assert_eq!(buckets[0], 100);
    }
}
