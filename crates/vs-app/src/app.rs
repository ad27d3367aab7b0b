use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Sparkline};
use ratatui::{DefaultTerminal, Frame};

use vs_audio::capture::Recorder;
use vs_audio::mel::MelExtractor;
use vs_core::clip::{Outcome, Prediction, CLIP_SECS};
use vs_core::config::ScreeningConfig;
use vs_model::ModelHandle;

use crate::pipeline::{self, CycleReport};
use crate::speech::Speaker;

/// Largeur de la forme d'onde affichée, en seaux.
const WAVEFORM_BUCKETS: usize = 128;

/// État d'affichage entre deux cycles.
///
/// # Example
/// ```
/// use vs_app::app::Status;
/// let status = Status::Welcome;
/// assert!(matches!(status, Status::Welcome));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Status {
    /// Aucun cycle lancé depuis le démarrage.
    Welcome,
    /// Capture en cours (affiché pendant les 3 secondes bloquantes).
    Recording,
    /// Dernier clip trop faible pour être analysé.
    TooQuiet,
    /// Verdict du dernier cycle.
    Result(Prediction),
}

/// Main application struct holding all state.
pub struct App {
    /// Configuration du dépistage.
    pub config: ScreeningConfig,
    /// Disponibilité du classifieur, fixée au démarrage.
    pub model: ModelHandle,
    /// Capture micro (flux cpal actif en tâche de fond).
    pub recorder: Recorder,
    /// Extracteur log-mel, buffers réutilisés d'un cycle à l'autre.
    pub extractor: MelExtractor,
    /// Annonce vocale, `None` si indisponible ou désactivée.
    pub speaker: Option<Speaker>,
    /// Chemin du WAV écrasé à chaque capture.
    pub wav_path: PathBuf,
    /// État d'affichage courant.
    pub status: Status,
    /// Forme d'onde du dernier clip, remplacée à chaque cycle.
    pub waveform: Vec<u64>,
    quitting: bool,
}

impl App {
    /// Construit l'application autour d'un enregistreur déjà ouvert.
    #[must_use]
    pub fn new(
        config: ScreeningConfig,
        model: ModelHandle,
        recorder: Recorder,
        speaker: Option<Speaker>,
    ) -> Self {
        let extractor = MelExtractor::new(&config);
        let wav_path = config.wav_path.clone();
        Self {
            config,
            model,
            recorder,
            extractor,
            speaker,
            wav_path,
            status: Status::Welcome,
            waveform: vec![0; WAVEFORM_BUCKETS],
            quitting: false,
        }
    }

    /// Boucle principale : dessin, attente clavier, cycles de dépistage.
    ///
    /// # Errors
    /// Propage les erreurs du terminal et de la capture audio.
    pub fn run(&mut self, mut terminal: DefaultTerminal) -> Result<()> {
        loop {
            if self.quitting {
                break;
            }

            terminal.draw(|frame| self.draw(frame))?;

            if event::poll(Duration::from_millis(200))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(&key, &mut terminal)?;
                }
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: &KeyEvent, terminal: &mut DefaultTerminal) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }
        match key.code {
            KeyCode::Char('q' | 'Q') | KeyCode::Esc => self.quitting = true,
            KeyCode::Char('r' | 'R' | ' ') | KeyCode::Enter => self.run_cycle(terminal)?,
            _ => {}
        }
        Ok(())
    }

    /// Un cycle complet : capture bloquante puis analyse et annonce.
    fn run_cycle(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        // Affiche l'état « enregistrement » avant de bloquer 3 secondes.
        self.status = Status::Recording;
        terminal.draw(|frame| self.draw(frame))?;

        let raw = self.recorder.record(self.config.duration_secs)?;
        let sample_rate = self.recorder.sample_rate();

        let report = pipeline::process_recording(
            raw,
            sample_rate,
            &self.config,
            &mut self.extractor,
            &self.model,
            Some(&self.wav_path),
        );

        match report {
            CycleReport::TooQuiet => {
                self.status = Status::TooQuiet;
                self.waveform = vec![0; WAVEFORM_BUCKETS];
            }
            CycleReport::Screened { prediction, clip } => {
                self.waveform = pipeline::waveform_buckets(&clip.samples, WAVEFORM_BUCKETS);
                if let Some(speaker) = &mut self.speaker {
                    speaker.announce(prediction.outcome.label());
                }
                self.status = Status::Result(prediction);
            }
        }
        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        let [title_area, result_area, wave_area, help_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(6),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        self.draw_title(frame, title_area);
        self.draw_result(frame, result_area);
        self.draw_waveform(frame, wave_area);
        self.draw_help(frame, help_area);
    }

    fn draw_title(&self, frame: &mut Frame, area: Rect) {
        let model_str = if self.model.is_loaded() {
            Span::styled("modèle chargé", Style::default().fg(Color::Green))
        } else {
            Span::styled("mode dégradé (sans modèle)", Style::default().fg(Color::Yellow))
        };
        let title = Paragraph::new(Line::from(vec![
            Span::raw("Dépistage vocal — démo, pas un diagnostic — "),
            model_str,
        ]))
        .block(Block::default().borders(Borders::ALL).title(" voicescreen "));
        frame.render_widget(title, area);
    }

    fn draw_result(&self, frame: &mut Frame, area: Rect) {
        let (lines, color) = match &self.status {
            Status::Welcome => (
                vec![
                    Line::from(format!(
                        "Appuyez sur R et parlez pendant {CLIP_SECS} secondes."
                    )),
                    Line::from("Tenez une voyelle (« aaah ») d'une voix naturelle."),
                ],
                Color::Cyan,
            ),
            Status::Recording => (
                vec![Line::from(format!(
                    "Enregistrement en cours ({CLIP_SECS} s)... parlez maintenant."
                ))],
                Color::Cyan,
            ),
            Status::TooQuiet => (
                vec![
                    Line::from("Trop faible : rien n'a été analysé."),
                    Line::from("Parlez plus fort et recommencez."),
                ],
                Color::Yellow,
            ),
            Status::Result(prediction) => {
                let color = match prediction.outcome {
                    Outcome::Healthy => Color::Green,
                    Outcome::Detected => Color::Red,
                    Outcome::ModelMissing => Color::Yellow,
                };
                let mut lines = vec![Line::from(Span::styled(
                    prediction.outcome.label(),
                    Style::default().fg(color),
                ))];
                if let Some(label) = prediction.confidence_label() {
                    lines.push(Line::from(format!("({label} confidence)")));
                }
                (lines, color)
            }
        };

        let result = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Résultat ")
                .border_style(Style::default().fg(color)),
        );
        frame.render_widget(result, area);
    }

    fn draw_waveform(&self, frame: &mut Frame, area: Rect) {
        let sparkline = Sparkline::default()
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .title(" Forme d'onde "),
            )
            .data(&self.waveform)
            .max(100)
            .style(Style::default().fg(Color::Cyan));
        frame.render_widget(sparkline, area);
    }

    fn draw_help(&self, frame: &mut Frame, area: Rect) {
        let help = Paragraph::new(" R : enregistrer    Q : quitter")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, area);
    }
}
