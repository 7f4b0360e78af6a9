//! Asynchronous abstraction for sourcing player decisions.
//!
//! Sessions plug in an [`InputSource`] implementation so a game can run with
//! human input over any transport, scripted fixtures, or bots. Each request
//! carries the time allowed for the answer so implementations can surface a
//! countdown; the session enforces the deadline with its own timer regardless,
//! so a stalled implementation can never wedge a game.
use std::time::Duration;

use async_trait::async_trait;

use game_core::{Party, PlayerId};

/// Why a requested decision never arrived.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    /// No answer within the allowed time. The session also synthesizes this
    /// when its own deadline fires first.
    #[error("response deadline elapsed")]
    Timeout,

    /// The player is permanently gone and should be removed from the game.
    #[error("player disconnected")]
    Disconnected,
}

/// Trait for sourcing the three decisions the game asks players for.
///
/// Implementations are queried concurrently during elections (one `vote` call
/// per living player), so they must tolerate overlapping requests.
#[async_trait]
pub trait InputSource: Send + Sync {
    /// Asks the sitting president to pick a chancellor candidate.
    ///
    /// `eligible` is the full legal candidate set in seat order. Answers
    /// outside it are rejected and re-requested by the session.
    async fn nomination(
        &self,
        president: PlayerId,
        eligible: &[PlayerId],
        allowed: Duration,
    ) -> Result<PlayerId, InputError>;

    /// Asks one player for their vote on the nominated government.
    async fn vote(
        &self,
        voter: PlayerId,
        nominee: PlayerId,
        allowed: Duration,
    ) -> Result<bool, InputError>;

    /// Asks a player to pick `choose` cards from `hand`, by index.
    ///
    /// The president picks two of three to forward; the chancellor picks one
    /// of two to enact. Duplicate or out-of-range indices are rejected and
    /// re-requested by the session.
    async fn policy_choice(
        &self,
        chooser: PlayerId,
        hand: &[Party],
        choose: usize,
        allowed: Duration,
    ) -> Result<Vec<usize>, InputError>;
}
