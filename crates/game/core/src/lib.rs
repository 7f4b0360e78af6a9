//! Deterministic rules for a hidden-role legislative card game.
//!
//! `game-core` defines the canonical rules (roles, deck, board, phase machine)
//! and exposes pure APIs that can be reused by the runtime and offline tools.
//! Nothing here waits, times out, or talks to a player: randomness comes in
//! through [`rand::Rng`] parameters and all state mutation flows through
//! [`engine::GameEngine`].
pub mod engine;
pub mod nomination;
pub mod roles;
pub mod state;

pub use engine::{Ballot, ElectionOutcome, Enactment, EngineError, GameEngine, RoundEnd};
pub use roles::Briefing;
pub use state::{
    Board, DeckError, FASCIST_POLICIES, FASCIST_TRACK, GameState, HITLER_CHANCELLOR_THRESHOLD,
    LIBERAL_POLICIES, LIBERAL_TRACK, MAX_PLAYERS, MIN_PLAYERS, PRESIDENT_DRAW, Party, PlayerId,
    PlayerState, PolicyDeck, Role, RoundPhase, RoundState, StartError, WinCondition,
};
