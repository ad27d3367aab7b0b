//! Annonce vocale des résultats via le moteur TTS de la plateforme.
//! Toute défaillance est journalisée et non fatale : le dépistage
//! continue en silence.

use log::warn;
use tts::Tts;

/// Synthèse vocale optionnelle.
pub struct Speaker {
    engine: Tts,
}

impl Speaker {
    /// Initialise le moteur TTS de la plateforme.
    ///
    /// Retourne `None` (et journalise) si aucun moteur n'est disponible.
    #[must_use]
    pub fn new() -> Option<Self> {
        match Tts::default() {
            Ok(engine) => Some(Self { engine }),
            Err(e) => {
                warn!("Synthèse vocale indisponible : {e}");
                None
            }
        }
    }

    /// Prononce `text`, en interrompant une annonce en cours.
    pub fn announce(&mut self, text: &str) {
        if let Err(e) = self.engine.speak(text, true) {
            warn!("Annonce vocale échouée : {e}");
        }
    }
}
