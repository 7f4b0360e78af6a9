//! Events emitted while a game runs, for front-ends to observe.
//!
//! Consumers subscribe through a game's handle and react to state changes
//! without blocking the session. Events are the public record of a game:
//! they never carry a role, a briefing, or the contents of a hand.
use game_core::{Party, PlayerId, WinCondition};

/// Events published by a running game session.
#[derive(Debug, Clone)]
pub enum GameEvent {
    /// A round began with this president.
    RoundStarted { round: u32, president: PlayerId },
    /// The president put a candidate up for election.
    NominationMade {
        president: PlayerId,
        nominee: PlayerId,
    },
    /// All ballots are in and the election was tallied.
    ElectionResolved {
        nominee: PlayerId,
        yes: usize,
        no: usize,
        confirmed: bool,
    },
    /// The chancellor placed a policy on the board.
    PolicyEnacted {
        party: Party,
        liberal: u8,
        fascist: u8,
    },
    /// The draw pile was rebuilt from the cards not yet enacted.
    DeckRebuilt { remaining: usize },
    /// The round was abandoned mid-phase by a deadline, an exhausted retry
    /// budget, or a lost participant. Failed elections are reported through
    /// [`GameEvent::ElectionResolved`] instead.
    RoundForfeited { round: u32 },
    /// A player left the game permanently.
    PlayerRemoved { player: PlayerId, living: usize },
    /// Terminal: a win condition fired.
    GameEnded { win: WinCondition, winner: Party },
    /// Terminal: the game was aborted from outside.
    GameAborted,
}
