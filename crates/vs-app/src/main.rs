use anyhow::Result;
use clap::Parser;

use vs_audio::capture::Recorder;
use vs_core::config::{load_config, ScreeningConfig};
use vs_model::ModelHandle;

pub mod app;
pub mod cli;
pub mod pipeline;
pub mod speech;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Charger la config
    let mut config = resolve_config(&cli)?;

    // 3b. Appliquer les overrides CLI
    if let Some(ref path) = cli.model {
        config.model_path = path.clone();
    }
    if let Some(ref path) = cli.output {
        config.wav_path = path.clone();
    }
    if cli.no_speech {
        config.speak_results = false;
    }

    // 4. Charger le modèle (soft-fail : mode dégradé si absent)
    let model = ModelHandle::load(&config.model_path);

    // 5. Ouvrir le micro
    let recorder = Recorder::open(config.sample_rate)?;

    // 6. Initialiser la synthèse vocale (si activée)
    let speaker = if config.speak_results {
        speech::Speaker::new()
    } else {
        None
    };

    // 7. Initialiser le terminal ratatui
    let terminal = ratatui::init();

    // 8. Construire l'App et lancer la boucle principale
    let mut app_instance = app::App::new(config, model, recorder, speaker);
    let result = app_instance.run(terminal);

    // 9. Restaurer le terminal (TOUJOURS, même en cas d'erreur)
    ratatui::restore();

    result
}

/// Resolve config: fall back to defaults when the file is absent.
fn resolve_config(cli: &cli::Cli) -> Result<ScreeningConfig> {
    if cli.config.exists() {
        load_config(&cli.config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(ScreeningConfig::default())
    }
}
