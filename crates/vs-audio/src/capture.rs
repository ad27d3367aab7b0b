//! Capture microphone via cpal, transfert vers le thread principal par
//! un buffer circulaire lock-free (rtrb).

use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{debug, error, info, warn};
use rtrb::{Consumer, RingBuffer};

use vs_core::clip::VoiceClip;

use crate::error::AudioError;
use crate::level::peak;

/// Marge du buffer circulaire : deux secondes d'audio au débit capturé.
const RING_SECS: usize = 2;
/// Période de sondage du consommateur pendant l'enregistrement.
const POLL: Duration = Duration::from_millis(50);

/// Enregistreur microphone mono.
///
/// Le flux cpal tourne en tâche de fond dès [`Recorder::open`] ; le
/// callback temps réel ne fait que moyenner les canaux et pousser dans
/// le ring buffer. Tout le reste (drainage, découpe, normalisation) se
/// fait côté consommateur.
pub struct Recorder {
    _stream: cpal::Stream,
    consumer: Consumer<f32>,
    sample_rate: u32,
}

impl Recorder {
    /// Ouvre le périphérique d'entrée par défaut, au plus proche de
    /// `wanted_rate` Hz.
    ///
    /// # Errors
    /// Retourne une erreur si aucun périphérique d'entrée n'existe, si
    /// aucune configuration n'est utilisable, ou si le flux ne démarre
    /// pas.
    pub fn open(wanted_rate: u32) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or(AudioError::NoInputDevice)?;
        info!(
            "Périphérique d'entrée : {}",
            device.name().unwrap_or_else(|_| "inconnu".into())
        );

        let config = nearest_input_config(&device, wanted_rate)?;
        let sample_rate = config.sample_rate.0;
        let channels = config.channels as usize;
        if sample_rate != wanted_rate {
            warn!("Capture à {sample_rate} Hz au lieu de {wanted_rate} Hz");
        }

        let (mut producer, consumer) =
            RingBuffer::<f32>::new(sample_rate as usize * RING_SECS);

        let stream = device
            .build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    // Moyenne des canaux vers mono ; en cas de buffer
                    // plein les échantillons sont perdus (drainés avant
                    // chaque enregistrement).
                    for frame in data.chunks(channels) {
                        let mono = frame.iter().sum::<f32>() / channels as f32;
                        let _ = producer.push(mono);
                    }
                },
                |err| error!("Erreur du flux de capture : {err}"),
                None,
            )
            .map_err(|e| AudioError::StreamError(e.to_string()))?;

        stream
            .play()
            .map_err(|e| AudioError::StreamError(e.to_string()))?;

        Ok(Self {
            _stream: stream,
            consumer,
            sample_rate,
        })
    }

    /// Sample rate of the running stream.
    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Enregistre `duration_secs` secondes d'audio et retourne les
    /// échantillons bruts.
    ///
    /// Les échantillons accumulés avant l'appel sont jetés ; l'appel
    /// bloque ensuite jusqu'à avoir collecté la durée demandée.
    ///
    /// # Errors
    /// Retourne [`AudioError::DeviceStalled`] si le périphérique ne
    /// fournit pas assez d'échantillons dans un délai raisonnable.
    pub fn record(&mut self, duration_secs: u32) -> Result<Vec<f32>, AudioError> {
        let wanted = self.sample_rate as usize * duration_secs as usize;

        // Drainage : on repart d'un buffer vide.
        let mut stale = 0usize;
        while self.consumer.pop().is_ok() {
            stale += 1;
        }
        debug!("{stale} échantillons périmés jetés avant capture");

        let mut samples = Vec::with_capacity(wanted);
        let deadline = Instant::now() + Duration::from_secs(u64::from(duration_secs) * 2 + 2);

        while samples.len() < wanted {
            while samples.len() < wanted {
                match self.consumer.pop() {
                    Ok(s) => samples.push(s),
                    Err(_) => break,
                }
            }
            if samples.len() >= wanted {
                break;
            }
            if Instant::now() >= deadline {
                return Err(AudioError::DeviceStalled {
                    got: samples.len(),
                    wanted,
                });
            }
            std::thread::sleep(POLL);
        }

        Ok(samples)
    }
}

/// Choisit la configuration d'entrée dont le sample rate est le plus
/// proche de `wanted`.
fn nearest_input_config(
    device: &cpal::Device,
    wanted: u32,
) -> Result<cpal::StreamConfig, AudioError> {
    let ranges = device
        .supported_input_configs()
        .map_err(|e| AudioError::StreamError(e.to_string()))?;

    let mut best: Option<(u32, cpal::SupportedStreamConfig)> = None;
    for range in ranges {
        let rate = wanted.clamp(range.min_sample_rate().0, range.max_sample_rate().0);
        let dist = rate.abs_diff(wanted);
        let cfg = range.with_sample_rate(cpal::SampleRate(rate));
        if best.as_ref().is_none_or(|(d, _)| dist < *d) {
            best = Some((dist, cfg));
        }
    }

    best.map(|(_, cfg)| cfg.config())
        .ok_or(AudioError::UnsupportedRate { wanted })
}

/// Met en forme un enregistrement brut : longueur exacte, amplitude
/// bornée, et filtre de silence.
///
/// Retourne `None` si le pic d'amplitude est sous `silence_peak` (clip
/// jugé silencieux, à ne pas analyser).
///
/// # Example
/// ```
/// use vs_audio::capture::finalize_recording;
/// let clip = finalize_recording(vec![0.5; 100], 22_050, 0.01, 200).unwrap();
/// assert_eq!(clip.samples.len(), 200);
/// assert!(finalize_recording(vec![0.001; 200], 22_050, 0.01, 200).is_none());
/// ```
#[must_use]
pub fn finalize_recording(
    mut samples: Vec<f32>,
    sample_rate: u32,
    silence_peak: f32,
    expected_len: usize,
) -> Option<VoiceClip> {
    samples.truncate(expected_len);
    samples.resize(expected_len, 0.0);
    for s in &mut samples {
        *s = s.clamp(-1.0, 1.0);
    }

    let p = peak(&samples);
    if p < silence_peak {
        info!("Clip silencieux (pic {p:.4}), analyse ignorée");
        return None;
    }

    Some(VoiceClip::new(samples, sample_rate))
}
