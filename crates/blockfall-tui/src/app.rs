use std::time::Duration;

use blockfall_engine::{GameSession, SessionState, Snapshot, SpawnSeed};
use crossterm::event::Event;
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout},
    style::{Color, Style},
    text::{Line, Text},
    widgets::{Block, Clear},
};

use crate::{
    audio::AudioOutput,
    input::KeyTranslator,
    tui::{App, Tui},
    ui::widgets::{FieldDisplay, StatsDisplay, style},
};

/// The interactive game application.
///
/// Owns the engine session and wires the collaborators around it: key
/// events go through the [`KeyTranslator`] into session commands, each
/// tick advances the session by the measured elapsed time, and the
/// resulting snapshot feeds the widgets and the audio cues.
pub struct PlayApp {
    session: GameSession,
    snapshot: Snapshot,
    keys: KeyTranslator,
    audio: Option<AudioOutput>,
    tick_rate: f64,
}

impl PlayApp {
    pub fn new(fps: u32, seed: Option<SpawnSeed>, mute: bool) -> Self {
        let session = match seed {
            Some(seed) => GameSession::with_seed(seed),
            None => GameSession::new(),
        };
        let snapshot = session.snapshot();
        let audio = if mute { None } else { AudioOutput::open() };
        Self {
            session,
            snapshot,
            keys: KeyTranslator::new(false),
            audio,
            tick_rate: f64::from(fps),
        }
    }
}

impl App for PlayApp {
    fn init(&mut self, tui: &mut Tui) {
        tui.set_tick_rate(self.tick_rate);
        tui.set_render_rate(self.tick_rate);
        self.keys = KeyTranslator::new(tui.supports_key_release());
    }

    fn should_exit(&self) -> bool {
        self.session.is_quit_requested()
    }

    fn handle_event(&mut self, event: Event) {
        if let Some(key) = event.as_key_event() {
            for command in self.keys.translate(key) {
                self.session.apply(command);
            }
        }
    }

    fn update(&mut self, elapsed: Duration) {
        self.snapshot = self.session.tick(elapsed);
        if let Some(audio) = &self.audio {
            audio.play(self.snapshot.events);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let border_style = match self.snapshot.state {
            SessionState::Running => style::RUNNING_BORDER,
            SessionState::GameOver => style::GAME_OVER_BORDER,
        };

        let field = FieldDisplay::new(&self.snapshot.playfield).block(
            Block::bordered()
                .border_style(border_style)
                .style(style::DEFAULT),
        );
        let stats = StatsDisplay::new(&self.snapshot).block(
            Block::bordered()
                .title(Line::from("INFO").centered())
                .border_style(border_style)
                .style(style::DEFAULT),
        );
        let help_text = match self.snapshot.state {
            SessionState::Running => {
                "Controls: ← → (Move) | ↓ (Soft Drop) | Z X (Rotate) | Q (Quit)"
            }
            SessionState::GameOver => "Controls: Q (Quit)",
        };
        let help = Text::from(help_text)
            .style(Style::default().fg(Color::DarkGray))
            .centered();

        let [main_area, help_area] =
            Layout::vertical([Constraint::Length(field.height()), Constraint::Length(1)])
                .areas(frame.area());
        let [field_area, stats_column] = Layout::horizontal([
            Constraint::Length(field.width()),
            Constraint::Length(stats.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(main_area);
        let [stats_area] =
            Layout::vertical([Constraint::Length(stats.height())]).areas(stats_column);

        frame.render_widget(&field, field_area);
        frame.render_widget(&stats, stats_area);
        frame.render_widget(help, help_area);

        if self.snapshot.state.is_game_over() {
            let banner_style = style::GAME_OVER_BANNER;
            let block = Block::new().style(banner_style);
            let text = Text::styled("GAME OVER!!", banner_style).centered();
            let area = field_area.centered(
                Constraint::Length(field.width()),
                Constraint::Length(3),
            );
            let inner = block.inner(area);
            frame.render_widget(Clear, area);
            frame.render_widget(block, area);
            frame.render_widget(text, inner.centered_vertically(Constraint::Length(1)));
        }
    }
}
