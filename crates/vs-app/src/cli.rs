use std::path::PathBuf;

use clap::Parser;

/// voicescreen — Dépistage vocal Parkinson (démo, pas un diagnostic).
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Chemin du modèle ONNX (prioritaire sur la config).
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Chemin du fichier WAV exporté à chaque capture (prioritaire sur la config).
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Désactiver l'annonce vocale des résultats.
    #[arg(long, default_value_t = false)]
    pub no_speech: bool,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}
