//! Async orchestration for the hidden-role turn engine.
//!
//! This crate wires the pure rules in `game-core` to the outside world: it
//! launches one task per game, gathers player decisions through the
//! [`InputSource`] trait, narrates through the [`Notifier`] trait, and
//! publishes a [`GameEvent`] feed per game. Consumers launch games through
//! [`GameRegistry`] and hold a [`GameHandle`] per game.
//!
//! Modules are organized by responsibility:
//! - [`api`] exposes the traits and types downstream clients interact with
//! - [`registry`] hosts the launcher and per-game handles
//! - `session` keeps the game loop internal to the crate
pub mod api;
pub mod registry;

mod session;

pub use api::{
    Audience, GameError, GameEvent, InputError, InputSource, Notifier, NullNotifier, RegistryError,
    Result, Severity,
};
pub use registry::{GameHandle, GameId, GameRegistry, RuntimeConfig};
