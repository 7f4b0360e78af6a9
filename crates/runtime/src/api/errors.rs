//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from game setup, session lifecycle, and registry addressing
//! so clients can bubble them up with consistent context.
use thiserror::Error;

use game_core::{MIN_PLAYERS, StartError};

use crate::registry::GameId;

pub type Result<T> = std::result::Result<T, GameError>;

/// Terminal failure of a single game.
///
/// Anything recoverable (a failed election, an expired deadline, an invalid
/// selection) is absorbed at round or request scope inside the session and
/// never appears here.
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Start(#[from] StartError),

    #[error("game aborted")]
    Aborted,

    #[error("{living} living players remain, the game needs {MIN_PLAYERS}")]
    InsufficientPlayers { living: usize },

    #[error("game task failed to complete")]
    Join(#[source] tokio::task::JoinError),
}

/// Errors addressing games through the registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("no running game {game}")]
    UnknownGame { game: GameId },
}
