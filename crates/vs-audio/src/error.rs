use thiserror::Error;

/// Errors originating from the audio module.
#[derive(Error, Debug)]
pub enum AudioError {
    /// No audio input device found.
    #[error("Aucun périphérique audio d'entrée trouvé")]
    NoInputDevice,

    /// No input configuration near the requested sample rate.
    #[error("Aucune configuration d'entrée proche de {wanted} Hz")]
    UnsupportedRate {
        /// Requested sample rate in Hz.
        wanted: u32,
    },

    /// Audio stream error.
    #[error("Erreur de stream audio : {0}")]
    StreamError(String),

    /// The device produced no samples within the recording window.
    #[error("Périphérique muet : {got} échantillons reçus sur {wanted}")]
    DeviceStalled {
        /// Samples received.
        got: usize,
        /// Samples expected.
        wanted: usize,
    },
}
