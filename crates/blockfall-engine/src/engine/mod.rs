//! Game logic and state management.
//!
//! This module provides the high-level logic that orchestrates the core
//! data structures into a playable game:
//!
//! - [`GameSession`] - Tick orchestrator owning field, piece, and progression
//! - [`Progression`] - Score, level, and cleared-row accounting
//! - [`Spawner`] - Uniform random piece source
//! - [`SpawnSeed`] - Seed for deterministic piece sequences
//!
//! # Game Flow
//!
//! 1. Initialize a [`GameSession`] (optionally with a [`SpawnSeed`])
//! 2. Feed abstract input [`Command`]s via [`GameSession::apply`]
//! 3. Advance the simulation with [`GameSession::tick`], passing the
//!    elapsed wall time since the previous tick
//! 4. Hand the returned [`Snapshot`] to rendering and its
//!    [`TickEvents`] to audio
//! 5. Repeat until the session reports a quit request or shows
//!    [`SessionState::GameOver`]
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use blockfall_engine::{Command, GameSession};
//!
//! let mut session = GameSession::new();
//! session.apply(Command::MoveLeftStart);
//! let snapshot = session.tick(Duration::from_millis(16));
//! session.apply(Command::MoveLeftEnd);
//!
//! assert_eq!(snapshot.level, 1);
//! ```

pub use self::{game_session::*, progression::*, spawner::*};

mod game_session;
mod progression;
mod spawner;
