//! Export WAV (PCM 16 bits mono) via hound.

use std::path::Path;

use anyhow::Context;
use hound::{SampleFormat, WavSpec, WavWriter};
use log::info;

use vs_core::clip::VoiceClip;

/// Écrit un clip au format WAV PCM 16 bits mono.
///
/// # Errors
/// Retourne une erreur si le fichier ne peut pas être créé ou écrit.
pub fn write_clip(path: &Path, clip: &VoiceClip) -> anyhow::Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: clip.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)
        .with_context(|| format!("Création du fichier WAV {}", path.display()))?;

    for &s in &clip.samples {
        let v = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
        writer.write_sample(v).context("Écriture d'un échantillon WAV")?;
    }

    writer.finalize().context("Finalisation du fichier WAV")?;
    info!(
        "Clip exporté : {} ({} échantillons à {} Hz)",
        path.display(),
        clip.samples.len(),
        clip.sample_rate
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vs_core::clip::SAMPLE_RATE;

    #[test]
    fn round_trip_preserves_shape_and_amplitude() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("clip.wav");

        let samples: Vec<f32> = (0..2205)
            .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / SAMPLE_RATE as f32).sin())
            .collect();
        let clip = VoiceClip::new(samples.clone(), SAMPLE_RATE);
        write_clip(&path, &clip).expect("write should succeed");

        let mut reader = hound::WavReader::open(&path).expect("open");
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, SAMPLE_RATE);
        assert_eq!(spec.bits_per_sample, 16);

        let decoded: Vec<f32> = reader
            .samples::<i16>()
            .map(|s| f32::from(s.expect("sample")) / 32767.0)
            .collect();
        assert_eq!(decoded.len(), samples.len());
        for (a, b) in decoded.iter().zip(samples.iter()) {
            assert!((a - b).abs() < 1e-3);
        }
    }

    #[test]
    fn out_of_range_samples_are_clamped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("hot.wav");
        let clip = VoiceClip::new(vec![2.0, -2.0], SAMPLE_RATE);
        write_clip(&path, &clip).expect("write");

        let mut reader = hound::WavReader::open(&path).expect("open");
        let decoded: Vec<i16> = reader.samples::<i16>().map(|s| s.expect("sample")).collect();
        assert_eq!(decoded, vec![32767, -32767]);
    }
}
