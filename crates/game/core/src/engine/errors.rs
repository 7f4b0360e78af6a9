//! Error types for the round phase machine.

use crate::state::PlayerId;

/// Errors surfaced while applying a decision through the game engine.
///
/// `IneligibleNominee` and `InvalidSelection` are request-scope: the same
/// player can be asked again. `WrongPhase` means the caller's sequencing is
/// broken, not the player's input.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EngineError {
    #[error("{operation} is not legal during the {phase} phase")]
    WrongPhase {
        #[cfg_attr(feature = "serde", serde(skip))]
        operation: &'static str,
        #[cfg_attr(feature = "serde", serde(skip))]
        phase: &'static str,
    },

    #[error("player {nominee} cannot be nominated chancellor this round")]
    IneligibleNominee { nominee: PlayerId },

    #[error("player {player} is not seated in this game")]
    UnknownPlayer { player: PlayerId },

    #[error("selection {picks:?} is not a valid choice from {hand_size} cards")]
    InvalidSelection { picks: Vec<usize>, hand_size: usize },
}
