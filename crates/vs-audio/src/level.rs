/// Amplitude absolue maximale d'un buffer d'échantillons.
///
/// # Example
/// ```
/// use vs_audio::level::peak;
/// assert!((peak(&[0.1, -0.7, 0.3]) - 0.7).abs() < f32::EPSILON);
/// assert_eq!(peak(&[]), 0.0);
/// ```
#[must_use]
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max)
}

/// RMS (Root Mean Square) d'un buffer d'échantillons.
///
/// # Example
/// ```
/// use vs_audio::level::rms;
/// assert!((rms(&[0.5; 100]) - 0.5).abs() < 1e-6);
/// assert_eq!(rms(&[]), 0.0);
/// ```
#[must_use]
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
    (sum_sq / samples.len() as f32).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peak_ignores_sign() {
        assert!((peak(&[-1.0, 0.5]) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn rms_of_alternating_signal() {
        let samples: Vec<f32> = (0..1000).map(|i| if i % 2 == 0 { 0.3 } else { -0.3 }).collect();
        assert!((rms(&samples) - 0.3).abs() < 1e-6);
    }
}
