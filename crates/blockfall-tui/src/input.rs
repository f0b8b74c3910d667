use arrayvec::ArrayVec;
use blockfall_engine::Command;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Translates terminal key events into abstract session commands.
///
/// With key release reporting available (kitty keyboard protocol) held
/// movement keys map to `Start`/`End` command pairs, driving the engine's
/// velocity accumulation. Without it releases are invisible, so a press
/// maps to an immediate `Start`+`End` impulse - one cell per keypress -
/// which keeps the game playable instead of leaving a direction stuck on.
/// Terminal auto-repeat is dropped either way; the engine repeats held
/// motion by itself.
#[derive(Debug, Clone, Copy)]
pub struct KeyTranslator {
    track_releases: bool,
}

impl KeyTranslator {
    #[must_use]
    pub fn new(track_releases: bool) -> Self {
        Self { track_releases }
    }

    /// Commands produced by one key event: none, one, or a Start/End pair.
    #[must_use]
    pub fn translate(&self, key: KeyEvent) -> ArrayVec<Command, 2> {
        let mut commands = ArrayVec::new();
        match key.kind {
            KeyEventKind::Repeat => {}
            KeyEventKind::Press => match key.code {
                KeyCode::Left => {
                    self.held(&mut commands, Command::MoveLeftStart, Command::MoveLeftEnd);
                }
                KeyCode::Right => {
                    self.held(&mut commands, Command::MoveRightStart, Command::MoveRightEnd);
                }
                KeyCode::Down => {
                    self.held(&mut commands, Command::SoftDropStart, Command::SoftDropEnd);
                }
                KeyCode::Char('z') => commands.push(Command::RotateCcw),
                KeyCode::Char('x') => commands.push(Command::RotateCw),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    commands.push(Command::Quit);
                }
                KeyCode::Char('q') | KeyCode::Esc => commands.push(Command::Quit),
                _ => {}
            },
            KeyEventKind::Release => {
                if self.track_releases {
                    match key.code {
                        KeyCode::Left => commands.push(Command::MoveLeftEnd),
                        KeyCode::Right => commands.push(Command::MoveRightEnd),
                        KeyCode::Down => commands.push(Command::SoftDropEnd),
                        _ => {}
                    }
                }
            }
        }
        commands
    }

    fn held(&self, commands: &mut ArrayVec<Command, 2>, start: Command, end: Command) {
        commands.push(start);
        if !self.track_releases {
            commands.push(end);
        }
    }
}
