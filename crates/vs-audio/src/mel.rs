//! Banc de filtres mel (échelle Slaney) et extraction du spectrogramme
//! log-mel utilisé comme entrée du classifieur.

use vs_core::clip::{FeatureTensor, VoiceClip};
use vs_core::config::ScreeningConfig;

use crate::fft::FftPipeline;

/// Seuil numérique de l'échelle dB (évite log10(0)).
const AMIN: f32 = 1e-5;
/// Plage dynamique conservée sous le pic, en dB.
const TOP_DB: f32 = 80.0;

/// Conversion Hz → mel, échelle Slaney : linéaire sous 1 kHz,
/// logarithmique au-dessus.
#[must_use]
pub fn hertz_to_mel(freq: f32) -> f32 {
    const MIN_LOG_HZ: f32 = 1000.0;
    const MIN_LOG_MEL: f32 = 15.0;
    const LOGSTEP: f32 = 0.068_751_78;

    if freq >= MIN_LOG_HZ {
        MIN_LOG_MEL + (freq / MIN_LOG_HZ).ln() / LOGSTEP
    } else {
        3.0 * freq / 200.0
    }
}

/// Conversion mel → Hz, inverse de [`hertz_to_mel`].
#[must_use]
pub fn mel_to_hertz(mel: f32) -> f32 {
    const MIN_LOG_HZ: f32 = 1000.0;
    const MIN_LOG_MEL: f32 = 15.0;
    const LOGSTEP: f32 = 0.068_751_78;

    if mel >= MIN_LOG_MEL {
        MIN_LOG_HZ * (LOGSTEP * (mel - MIN_LOG_MEL)).exp()
    } else {
        200.0 * mel / 3.0
    }
}

/// Banc de filtres triangulaires sur l'échelle mel, normalisé en aire
/// (variante Slaney).
pub struct MelFilterbank {
    n_mels: usize,
    n_bins: usize,
    /// Poids aplatis : `weights[m * n_bins + k]`.
    weights: Vec<f32>,
}

impl MelFilterbank {
    /// Construit `n_mels` filtres couvrant 0 Hz à `fmax` pour une FFT
    /// de `n_fft` points à `sample_rate` Hz.
    #[must_use]
    pub fn new(n_mels: usize, n_fft: usize, sample_rate: u32, fmax: f32) -> Self {
        let n_bins = n_fft / 2 + 1;

        // Points mel équirépartis, n_mels + 2 bornes.
        let mel_min = hertz_to_mel(0.0);
        let mel_max = hertz_to_mel(fmax);
        let freqs: Vec<f32> = (0..n_mels + 2)
            .map(|i| {
                let mel = mel_min + (mel_max - mel_min) * i as f32 / (n_mels + 1) as f32;
                mel_to_hertz(mel)
            })
            .collect();

        let bin_hz = sample_rate as f32 / n_fft as f32;
        let mut weights = vec![0.0f32; n_mels * n_bins];

        for m in 0..n_mels {
            let (left, center, right) = (freqs[m], freqs[m + 1], freqs[m + 2]);
            // Normalisation Slaney : aire unitaire par filtre.
            let enorm = 2.0 / (right - left);

            for k in 0..n_bins {
                let f = k as f32 * bin_hz;
                let rise = (f - left) / (center - left);
                let fall = (right - f) / (right - center);
                let w = rise.min(fall).max(0.0);
                weights[m * n_bins + k] = w * enorm;
            }
        }

        Self {
            n_mels,
            n_bins,
            weights,
        }
    }

    /// Applique le banc de filtres à un spectre de puissance.
    ///
    /// # Panics
    /// Panics (debug) si les dimensions ne correspondent pas.
    pub fn apply(&self, power: &[f32], out: &mut [f32]) {
        debug_assert_eq!(power.len(), self.n_bins);
        debug_assert_eq!(out.len(), self.n_mels);

        for (m, slot) in out.iter_mut().enumerate() {
            let row = &self.weights[m * self.n_bins..(m + 1) * self.n_bins];
            *slot = row.iter().zip(power.iter()).map(|(w, p)| w * p).sum();
        }
    }

    /// Number of mel bands.
    #[must_use]
    pub fn n_mels(&self) -> usize {
        self.n_mels
    }
}

/// Extraction complète : clip audio → spectrogramme log-mel de forme
/// fixe `n_mels × target_frames`.
///
/// STFT centrée (padding par réflexion de `n_fft / 2` de part et
/// d'autre), spectre de puissance, banc de filtres mel, échelle dB
/// référencée au maximum global, puis padding/troncature temporelle à
/// `target_frames` colonnes.
pub struct MelExtractor {
    fft: FftPipeline,
    filterbank: MelFilterbank,
    n_fft: usize,
    hop: usize,
    n_mels: usize,
    target_frames: usize,
    power_buf: Vec<f32>,
    frame_buf: Vec<f32>,
}

impl MelExtractor {
    /// Construit l'extracteur d'après la configuration de dépistage.
    #[must_use]
    pub fn new(config: &ScreeningConfig) -> Self {
        let fft = FftPipeline::new(config.n_fft);
        let n_bins = fft.n_bins();
        let filterbank = MelFilterbank::new(
            config.n_mels,
            config.n_fft,
            config.sample_rate,
            config.fmax_hz,
        );

        Self {
            fft,
            filterbank,
            n_fft: config.n_fft,
            hop: config.hop_length,
            n_mels: config.n_mels,
            target_frames: config.target_frames,
            power_buf: vec![0.0; n_bins],
            frame_buf: vec![0.0; config.n_fft],
        }
    }

    /// Extrait le tenseur de caractéristiques d'un clip.
    ///
    /// La forme de sortie est toujours `n_mels × target_frames`, quelle
    /// que soit la durée du clip : les colonnes excédentaires sont
    /// tronquées, les manquantes remplies de zéros.
    pub fn extract(&mut self, clip: &VoiceClip) -> FeatureTensor {
        let samples = &clip.samples;
        let pad = self.n_fft / 2;
        let padded_len = samples.len() + 2 * pad;

        let n_frames = if padded_len >= self.n_fft {
            1 + (padded_len - self.n_fft) / self.hop
        } else {
            0
        };
        let kept = n_frames.min(self.target_frames);

        // Spectrogramme mel en puissance, colonne par colonne.
        let mut mel_power = vec![0.0f32; self.n_mels * kept];
        let mut column = vec![0.0f32; self.n_mels];

        for t in 0..kept {
            let start = t * self.hop;
            for (i, slot) in self.frame_buf.iter_mut().enumerate() {
                *slot = padded_sample(samples, pad, start + i);
            }
            let frame = std::mem::take(&mut self.frame_buf);
            self.fft.process_power(&frame, &mut self.power_buf);
            self.frame_buf = frame;

            self.filterbank.apply(&self.power_buf, &mut column);
            for (m, &v) in column.iter().enumerate() {
                mel_power[m * kept + t] = v;
            }
        }

        // Échelle dB référencée au maximum global, plancher à -80 dB
        // sous le pic.
        let reference = mel_power.iter().copied().fold(0.0f32, f32::max);
        let ref_db = 20.0 * reference.max(AMIN).log10();
        let mut peak_db = f32::NEG_INFINITY;
        for v in &mut mel_power {
            *v = 20.0 * v.max(AMIN).log10() - ref_db;
            peak_db = peak_db.max(*v);
        }
        let floor = peak_db - TOP_DB;
        for v in &mut mel_power {
            *v = v.max(floor);
        }

        // Forme fixe : troncature/padding temporel à droite.
        let mut tensor = FeatureTensor::zeros(self.n_mels, self.target_frames);
        for m in 0..self.n_mels {
            for t in 0..kept {
                tensor.set(m, t, mel_power[m * kept + t]);
            }
        }
        tensor
    }
}

/// Échantillon du signal paddé par réflexion : indice `i` dans
/// `[0, len + 2·pad)`.
fn padded_sample(samples: &[f32], pad: usize, i: usize) -> f32 {
    let len = samples.len();
    if len == 0 {
        return 0.0;
    }
    if i < pad {
        // Réflexion gauche : pad - i.
        samples.get(pad - i).copied().unwrap_or(0.0)
    } else if i < pad + len {
        samples[i - pad]
    } else {
        // Réflexion droite : len - 2 - (i - pad - len).
        let back = i - pad - len;
        if back + 2 <= len {
            samples[len - 2 - back]
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vs_core::clip::{CLIP_SAMPLES, N_MELS, SAMPLE_RATE, TARGET_FRAMES};

    fn extractor() -> MelExtractor {
        MelExtractor::new(&ScreeningConfig::default())
    }

    fn sine_clip(freq: f32, n: usize) -> VoiceClip {
        let samples: Vec<f32> = (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / SAMPLE_RATE as f32).sin())
            .collect();
        VoiceClip::new(samples, SAMPLE_RATE)
    }

    #[test]
    fn shape_is_fixed_for_nominal_clip() {
        let mut ex = extractor();
        let tensor = ex.extract(&sine_clip(220.0, CLIP_SAMPLES));
        assert_eq!(tensor.shape(), [1, N_MELS, TARGET_FRAMES, 1]);
        assert_eq!(tensor.as_slice().len(), N_MELS * TARGET_FRAMES);
    }

    #[test]
    fn shape_is_fixed_for_short_and_long_clips() {
        let mut ex = extractor();
        for n in [SAMPLE_RATE as usize, 10 * SAMPLE_RATE as usize] {
            let tensor = ex.extract(&sine_clip(220.0, n));
            assert_eq!(tensor.shape(), [1, N_MELS, TARGET_FRAMES, 1]);
        }
    }

    #[test]
    fn silence_yields_all_zero_tensor() {
        // Référence = AMIN partout : dB relatif nul sur tout le tenseur.
        let mut ex = extractor();
        let tensor = ex.extract(&VoiceClip::new(vec![0.0; CLIP_SAMPLES], SAMPLE_RATE));
        assert!(tensor.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn loudest_value_is_zero_db() {
        let mut ex = extractor();
        let tensor = ex.extract(&sine_clip(440.0, CLIP_SAMPLES));
        let max = tensor.as_slice().iter().copied().fold(f32::NEG_INFINITY, f32::max);
        assert!((max - 0.0).abs() < 1e-4);
    }

    #[test]
    fn values_bounded_by_dynamic_range() {
        let mut ex = extractor();
        let tensor = ex.extract(&sine_clip(440.0, CLIP_SAMPLES));
        assert!(tensor.as_slice().iter().all(|&v| (-80.0..=0.0).contains(&v)));
    }

    #[test]
    fn low_tone_energy_sits_in_low_bands() {
        let mut ex = extractor();
        let tensor = ex.extract(&sine_clip(150.0, CLIP_SAMPLES));
        // La colonne 10 est bien dans la zone couverte par un clip de 3 s.
        let t = 10;
        let best_band = (0..N_MELS)
            .max_by(|&a, &b| tensor.get(a, t).total_cmp(&tensor.get(b, t)))
            .unwrap_or(0);
        assert!(best_band < N_MELS / 4, "band {best_band} trop haut pour 150 Hz");
    }

    #[test]
    fn slaney_scale_round_trip() {
        for f in [100.0, 440.0, 1000.0, 4000.0, 8000.0] {
            let back = mel_to_hertz(hertz_to_mel(f));
            assert!((back - f).abs() / f < 1e-4);
        }
    }

    #[test]
    fn slaney_scale_is_linear_below_1khz() {
        assert!((hertz_to_mel(500.0) - 7.5).abs() < 1e-5);
        assert!((hertz_to_mel(1000.0) - 15.0).abs() < 1e-5);
    }
}
