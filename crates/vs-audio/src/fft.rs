use realfft::RealFftPlanner;

/// FFT pipeline: windowed real FFT using realfft.
///
/// Pre-allocates the FFT plan and scratch buffers so each frame of the
/// spectrogram is computed without allocation.
///
/// # Example
/// ```
/// use vs_audio::fft::FftPipeline;
/// let fft = FftPipeline::new(2048);
/// assert_eq!(fft.fft_size(), 2048);
/// ```
pub struct FftPipeline {
    fft_size: usize,
    input_buf: Vec<f32>,
    spectrum_buf: Vec<realfft::num_complex::Complex<f32>>,
    scratch: Vec<realfft::num_complex::Complex<f32>>,
    plan: std::sync::Arc<dyn realfft::RealToComplex<f32>>,
    /// Fenêtre de Hann périodique (convention STFT).
    window: Vec<f32>,
}

impl FftPipeline {
    /// Create a new FFT pipeline with the given window size.
    ///
    /// # Panics
    /// Panics if `size` is 0.
    #[must_use]
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "FFT size must be > 0");

        let mut planner = RealFftPlanner::<f32>::new();
        let plan = planner.plan_fft_forward(size);

        let input_buf = plan.make_input_vec();
        let spectrum_buf = plan.make_output_vec();
        let scratch = plan.make_scratch_vec();

        // Hann périodique : 0.5·(1 − cos(2πi/N)).
        let window: Vec<f32> = (0..size)
            .map(|i| 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / size as f32).cos()))
            .collect();

        Self {
            fft_size: size,
            input_buf,
            spectrum_buf,
            scratch,
            plan,
            window,
        }
    }

    /// Process `samples` through the windowed FFT and write the power
    /// spectrum (|X|², N/2+1 bins) into `out`.
    ///
    /// Inputs shorter than the window are zero-padded on the right.
    ///
    /// # Example
    /// ```
    /// use vs_audio::fft::FftPipeline;
    /// let mut fft = FftPipeline::new(256);
    /// let mut out = vec![0.0f32; 129];
    /// fft.process_power(&[0.0f32; 256], &mut out);
    /// assert!(out.iter().all(|&p| p == 0.0));
    /// ```
    pub fn process_power(&mut self, samples: &[f32], out: &mut [f32]) {
        let n = self.fft_size.min(samples.len());

        for (i, slot) in self.input_buf.iter_mut().enumerate() {
            *slot = if i < n {
                samples[i] * self.window[i]
            } else {
                0.0
            };
        }

        if self
            .plan
            .process_with_scratch(&mut self.input_buf, &mut self.spectrum_buf, &mut self.scratch)
            .is_err()
        {
            out.fill(0.0);
            return;
        }

        for (slot, c) in out.iter_mut().zip(self.spectrum_buf.iter()) {
            *slot = c.re * c.re + c.im * c.im;
        }
    }

    /// Number of frequency bins produced (N/2 + 1).
    #[must_use]
    pub fn n_bins(&self) -> usize {
        self.fft_size / 2 + 1
    }

    /// FFT window size.
    #[must_use]
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_of_sine_concentrates_at_bin() {
        let size = 1024;
        let mut fft = FftPipeline::new(size);
        // Sinus exactement sur le bin 32 (32 périodes par fenêtre).
        let samples: Vec<f32> = (0..size)
            .map(|i| (2.0 * std::f32::consts::PI * 32.0 * i as f32 / size as f32).sin())
            .collect();
        let mut power = vec![0.0f32; fft.n_bins()];
        fft.process_power(&samples, &mut power);

        let max_bin = power
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(i, _)| i)
            .unwrap_or(0);
        assert_eq!(max_bin, 32);
    }

    #[test]
    fn short_input_is_zero_padded() {
        let mut fft = FftPipeline::new(512);
        let mut power = vec![1.0f32; fft.n_bins()];
        fft.process_power(&[0.0f32; 10], &mut power);
        assert!(power.iter().all(|&p| p == 0.0));
    }
}
