use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    core::{Piece, Playfield},
    engine::{Progression, SpawnSeed, Spawner},
};

/// Abstract input commands consumed by the session.
///
/// Paired `Start`/`End` variants mirror key press and release. The session
/// accumulates them into the piece's velocity, so opposing held directions
/// cancel out and a missed release keeps a direction engaged; the input
/// layer must therefore deliver releases and filter auto-repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeftStart,
    MoveLeftEnd,
    MoveRightStart,
    MoveRightEnd,
    SoftDropStart,
    SoftDropEnd,
    RotateCw,
    RotateCcw,
    Quit,
}

/// Whether the session still accepts play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant, Deserialize, Serialize)]
pub enum SessionState {
    Running,
    GameOver,
}

/// Discrete notifications produced by one tick, consumed by audio.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TickEvents {
    /// The piece's descent was rejected this tick, fixing it into the
    /// field.
    pub landed: bool,
    /// Rows completed by the landing, 0 through 4.
    pub rows_cleared: usize,
}

/// Immutable view of the session emitted by [`GameSession::tick`].
///
/// The playfield copy has the piece overlaid the way it stood when the
/// frame was produced, so renderers can draw it directly.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Snapshot {
    pub playfield: Playfield,
    pub piece: Piece,
    pub state: SessionState,
    pub score: usize,
    pub level: usize,
    pub total_rows_cleared: usize,
    pub events: TickEvents,
}

/// One game: tick orchestrator owning field, piece, and progression.
///
/// The session is single-threaded and tick-driven. Commands are applied
/// between ticks with [`apply`](Self::apply); [`tick`](Self::tick) then
/// advances the simulation by the elapsed wall time and hands back a
/// [`Snapshot`]. The session never blocks and never touches a clock of its
/// own - pacing belongs to the caller.
#[derive(Debug, Clone)]
pub struct GameSession {
    playfield: Playfield,
    piece: Piece,
    spawner: Spawner,
    progression: Progression,
    state: SessionState,
    quit_requested: bool,
    fall_clock: Duration,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    /// Creates a session with a randomly seeded spawner.
    #[must_use]
    pub fn new() -> Self {
        Self::with_spawner(Spawner::new())
    }

    /// Creates a session with a deterministic piece sequence.
    #[must_use]
    pub fn with_seed(seed: SpawnSeed) -> Self {
        Self::with_spawner(Spawner::with_seed(seed))
    }

    fn with_spawner(mut spawner: Spawner) -> Self {
        let piece = spawner.spawn();
        Self {
            playfield: Playfield::new(),
            piece,
            spawner,
            progression: Progression::new(),
            state: SessionState::Running,
            quit_requested: false,
            fall_clock: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn playfield(&self) -> &Playfield {
        &self.playfield
    }

    #[must_use]
    pub fn piece(&self) -> &Piece {
        &self.piece
    }

    #[must_use]
    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// True once a [`Command::Quit`] has been applied. The driving loop
    /// finishes the in-flight tick and stops.
    #[must_use]
    pub fn is_quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Applies one abstract command ahead of the next tick.
    ///
    /// Movement and rotation are dropped silently once the game is over;
    /// `Quit` is always honored.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Quit => self.quit_requested = true,
            _ if self.state.is_game_over() => {}
            Command::MoveLeftStart => self.piece.steer(-1),
            Command::MoveLeftEnd => self.piece.steer(1),
            Command::MoveRightStart => self.piece.steer(1),
            Command::MoveRightEnd => self.piece.steer(-1),
            Command::SoftDropStart => self.piece.press_soft_drop(),
            Command::SoftDropEnd => self.piece.release_soft_drop(),
            Command::RotateCw => {
                self.piece.try_rotate_cw(&self.playfield);
            }
            Command::RotateCcw => {
                self.piece.try_rotate_ccw(&self.playfield);
            }
        }
    }

    /// Advances the simulation by one tick of `elapsed` wall time.
    ///
    /// In order: an automatic one-cell descent when the accumulated time
    /// passes the level's fall interval (skipped while a soft drop is
    /// engaged), the regular velocity move, then landing resolution - row
    /// clearing, progression, and the replacement spawn. A replacement
    /// that collides immediately ends the game.
    ///
    /// After the game is over the session stays inert and keeps emitting
    /// snapshots of the final field.
    pub fn tick(&mut self, elapsed: Duration) -> Snapshot {
        if self.state.is_game_over() {
            return self.snapshot_from(self.playfield.clone(), TickEvents::default());
        }

        self.fall_clock += elapsed;
        if self.fall_clock > self.progression.fall_interval() && self.piece.velocity().1 == 0 {
            self.fall_clock = Duration::ZERO;
            self.piece.gravity_step(&self.playfield);
        }
        self.piece.advance(&self.playfield);

        // Overlay the piece for the emitted frame; it stays committed only
        // once landed.
        self.playfield.commit(&self.piece);
        let frame = self.playfield.clone();

        let mut events = TickEvents {
            landed: self.piece.is_landed(),
            rows_cleared: 0,
        };
        if self.piece.is_landed() {
            events.rows_cleared = self.playfield.clear_full_rows();
            self.progression.record_landing(events.rows_cleared);
            self.piece = self.spawner.spawn();
            if self.piece.collides(&self.playfield) {
                self.state = SessionState::GameOver;
            }
        } else {
            self.playfield.erase(&self.piece);
        }

        self.snapshot_from(frame, events)
    }

    /// Current state as a snapshot, without advancing the simulation.
    ///
    /// Used for the initial frame before any tick has run.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let mut playfield = self.playfield.clone();
        playfield.commit(&self.piece);
        self.snapshot_from(playfield, TickEvents::default())
    }

    fn snapshot_from(&self, playfield: Playfield, events: TickEvents) -> Snapshot {
        Snapshot {
            playfield,
            piece: self.piece,
            state: self.state,
            score: self.progression.score(),
            level: self.progression.level(),
            total_rows_cleared: self.progression.total_rows_cleared(),
            events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FIELD_HEIGHT, ShapeKind};

    const TICK: Duration = Duration::from_millis(16);

    fn seeded_session() -> GameSession {
        GameSession::with_seed("000102030405060708090a0b0c0d0e0f".parse().unwrap())
    }

    /// Slides a fresh piece to `(x, y)` with one large displacement and
    /// commits it, building up field fixtures through the public API.
    fn commit_piece_at(field: &mut Playfield, shape: ShapeKind, x: i32, y: i32) {
        let mut piece = Piece::new(shape);
        let (spawn_x, spawn_y) = piece.position();
        piece.steer(x - spawn_x);
        for _ in 0..(y - spawn_y) {
            piece.press_soft_drop();
        }
        piece.advance(field);
        assert_eq!(piece.position(), (x, y), "fixture piece blocked en route");
        field.commit(&piece);
    }

    /// Ticks until the current piece lands, returning the landing
    /// snapshot.
    fn soft_drop_to_landing(session: &mut GameSession) -> Snapshot {
        session.apply(Command::SoftDropStart);
        for _ in 0..=FIELD_HEIGHT {
            let snapshot = session.tick(TICK);
            if snapshot.events.landed {
                session.apply(Command::SoftDropEnd);
                return snapshot;
            }
        }
        panic!("piece never landed");
    }

    #[test]
    fn test_fresh_session_snapshot() {
        let session = seeded_session();
        let snapshot = session.snapshot();

        assert_eq!(snapshot.state, SessionState::Running);
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.level, 1);
        assert_eq!(snapshot.total_rows_cleared, 0);
        assert_eq!(snapshot.events, TickEvents::default());
    }

    #[test]
    fn test_snapshot_overlays_piece_while_field_stays_clean() {
        let mut session = seeded_session();
        let snapshot = session.tick(TICK);

        for (x, y) in snapshot.piece.occupied_cells() {
            if y >= 0 {
                assert!(snapshot.playfield.is_filled(x, y), "overlay missing at ({x}, {y})");
            }
        }
        // The session's own field holds landed material only.
        assert_eq!(*session.playfield(), Playfield::new());
    }

    #[test]
    fn test_gravity_descends_after_fall_interval() {
        let mut session = seeded_session();
        let y0 = session.piece().position().1;

        // Two short ticks stay below the one-second interval of level 1.
        session.tick(Duration::from_millis(400));
        session.tick(Duration::from_millis(400));
        assert_eq!(session.piece().position().1, y0);

        // The third pushes the accumulated time past it.
        session.tick(Duration::from_millis(400));
        assert_eq!(session.piece().position().1, y0 + 1);

        // The accumulator was reset, so the next short tick is quiet again.
        session.tick(Duration::from_millis(400));
        assert_eq!(session.piece().position().1, y0 + 1);
    }

    #[test]
    fn test_gravity_defers_to_soft_drop() {
        let mut session = seeded_session();
        let y0 = session.piece().position().1;

        session.apply(Command::SoftDropStart);
        session.tick(Duration::from_millis(5000));
        // One cell from the velocity, none from gravity.
        assert_eq!(session.piece().position().1, y0 + 1);
    }

    #[test]
    fn test_opposing_holds_cancel() {
        let mut session = seeded_session();
        let x0 = session.piece().position().0;

        session.apply(Command::MoveLeftStart);
        session.apply(Command::MoveRightStart);
        session.tick(TICK);
        assert_eq!(session.piece().position().0, x0);

        // Releasing one direction lets the other take effect.
        session.apply(Command::MoveRightEnd);
        session.tick(TICK);
        assert_eq!(session.piece().position().0, x0 - 1);
        session.apply(Command::MoveLeftEnd);
    }

    #[test]
    fn test_landing_spawns_a_replacement() {
        let mut session = seeded_session();
        let snapshot = soft_drop_to_landing(&mut session);

        assert!(snapshot.events.landed);
        assert_eq!(snapshot.events.rows_cleared, 0);
        // The replacement piece is fresh, back at the top.
        assert!(!session.piece().is_landed());
        assert_eq!(session.piece().position().1, 0);
        // The landed material is now permanent field content.
        assert_ne!(*session.playfield(), Playfield::new());
        assert!(session.state().is_running());
    }

    #[test]
    fn test_landing_clears_completed_rows() {
        let mut session = seeded_session();
        // Pave the bottom four rows, leaving only column 7 open - the
        // column a vertical bar dropped from spawn falls through.
        let mut field = Playfield::new();
        for x in 0..16 {
            if x == 7 {
                continue;
            }
            commit_piece_at(&mut field, ShapeKind::I, x - 1, FIELD_HEIGHT as i32 - 4);
        }
        session.playfield = field;
        session.piece = Piece::new(ShapeKind::I);

        let snapshot = soft_drop_to_landing(&mut session);

        assert!(snapshot.events.landed);
        assert_eq!(snapshot.events.rows_cleared, 4);
        assert_eq!(snapshot.score, 1000);
        assert_eq!(snapshot.total_rows_cleared, 4);
        assert_eq!(snapshot.level, 1);
        // The emitted frame still shows the pre-clear field; the session's
        // field is compacted back to empty.
        assert_ne!(snapshot.playfield, Playfield::new());
        assert_eq!(*session.playfield(), Playfield::new());
    }

    #[test]
    fn test_blocked_spawn_ends_the_game_once() {
        let mut session = seeded_session();

        // Let the piece fall below the spawn region first.
        session.apply(Command::SoftDropStart);
        for _ in 0..6 {
            session.tick(TICK);
        }
        // Then wall off the spawn region so the replacement cannot fit.
        commit_piece_at(&mut session.playfield, ShapeKind::O, 5, 0);
        commit_piece_at(&mut session.playfield, ShapeKind::O, 7, 0);

        let mut landing = None;
        for _ in 0..=FIELD_HEIGHT {
            let snapshot = session.tick(TICK);
            if snapshot.events.landed {
                landing = Some(snapshot);
                break;
            }
        }
        let landing = landing.expect("piece never landed");

        assert_eq!(landing.state, SessionState::GameOver);
        assert!(session.state().is_game_over());

        // The session stays inert: no further events, no movement.
        let piece_before = *session.piece();
        session.apply(Command::MoveLeftStart);
        session.apply(Command::RotateCw);
        let after = session.tick(TICK);
        assert_eq!(after.state, SessionState::GameOver);
        assert_eq!(after.events, TickEvents::default());
        assert_eq!(*session.piece(), piece_before);
    }

    #[test]
    fn test_quit_is_honored_even_after_game_over() {
        let mut session = seeded_session();
        assert!(!session.is_quit_requested());

        session.apply(Command::Quit);
        assert!(session.is_quit_requested());

        let mut over = seeded_session();
        over.state = SessionState::GameOver;
        over.apply(Command::Quit);
        assert!(over.is_quit_requested());
    }

    #[test]
    fn test_rotation_commands_apply_once_per_press() {
        let mut session = seeded_session();
        let matrix_before = *session.piece().matrix();

        session.apply(Command::RotateCw);
        session.apply(Command::RotateCcw);
        assert_eq!(*session.piece().matrix(), matrix_before);
    }

    #[test]
    fn test_snapshot_serialization_roundtrip() {
        let mut session = seeded_session();
        let snapshot = session.tick(TICK);

        let serialized = serde_json::to_string(&snapshot).unwrap();
        let deserialized: Snapshot = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized.piece, snapshot.piece);
        assert_eq!(deserialized.playfield, snapshot.playfield);
        assert_eq!(deserialized.events, snapshot.events);
        assert_eq!(deserialized.state, snapshot.state);
    }
}
