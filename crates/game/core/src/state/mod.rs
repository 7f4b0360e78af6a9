//! Authoritative game state representation.
//!
//! This module owns the data structures that describe the table: seats and
//! secret roles, the policy board and draw pile, and the round bookkeeping
//! that the phase machine advances. Runtime layers clone or query this state
//! but mutate it exclusively through the engine.
pub mod board;
pub mod deck;
pub mod player;

use rand::Rng;

pub use board::{Board, FASCIST_TRACK, HITLER_CHANCELLOR_THRESHOLD, LIBERAL_TRACK, WinCondition};
pub use deck::{DeckError, FASCIST_POLICIES, LIBERAL_POLICIES, PRESIDENT_DRAW, PolicyDeck};
pub use player::{Party, PlayerId, PlayerState, Role};

use crate::nomination;
use crate::roles;

/// Fewest players a game can start with or continue running on.
pub const MIN_PLAYERS: usize = 5;

/// Most players a game can seat.
pub const MAX_PLAYERS: usize = 10;

/// Phase of the current round.
///
/// Data produced in one phase and consumed in a later one (the nominee under
/// vote, the president's drawn hand, the pair forwarded to the chancellor, the
/// card just enacted) rides in the phase itself rather than in transient
/// variables of whatever is driving the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoundPhase {
    /// The president is choosing a chancellor candidate.
    Nomination,
    /// The table is voting on the nominated government.
    Election { nominee: PlayerId },
    /// The president is discarding one of three drawn cards.
    PresidentLegislation { hand: [Party; 3] },
    /// The chancellor is enacting one of the two forwarded cards.
    ChancellorLegislation { forwarded: [Party; 2] },
    /// The round's enactment is on the board, awaiting conclusion.
    Summary { enacted: Party },
    /// Terminal. No further operation is legal.
    GameOver(WinCondition),
}

impl RoundPhase {
    pub const fn name(&self) -> &'static str {
        match self {
            RoundPhase::Nomination => "nomination",
            RoundPhase::Election { .. } => "election",
            RoundPhase::PresidentLegislation { .. } => "president legislation",
            RoundPhase::ChancellorLegislation { .. } => "chancellor legislation",
            RoundPhase::Summary { .. } => "summary",
            RoundPhase::GameOver(_) => "game over",
        }
    }
}

/// Bookkeeping for the round in progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundState {
    /// 1-based round counter. Increments on every round boundary, including
    /// forfeited rounds.
    pub number: u32,
    pub phase: RoundPhase,
    /// Seat index of the sitting president.
    pub president_seat: usize,
    /// Chancellor of the current round, set once the election passes.
    pub chancellor: Option<PlayerId>,
    /// President of the last round that enacted a policy.
    pub prev_president: Option<PlayerId>,
    /// Chancellor of the last round that enacted a policy.
    pub prev_chancellor: Option<PlayerId>,
}

impl RoundState {
    fn first() -> Self {
        Self {
            number: 1,
            phase: RoundPhase::Nomination,
            president_seat: 0,
            chancellor: None,
            prev_president: None,
            prev_chancellor: None,
        }
    }
}

/// Errors that prevent a game from starting.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StartError {
    #[error("cannot seat {count} players, the game needs {MIN_PLAYERS} to {MAX_PLAYERS}")]
    InvalidPlayerCount { count: usize },
}

/// Canonical snapshot of one running game.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    /// Seated players in seat order. Never reordered or truncated.
    pub players: Vec<PlayerState>,
    /// Enacted-policy counters.
    pub board: Board,
    /// Policy draw pile.
    pub deck: PolicyDeck,
    /// Current round bookkeeping.
    pub round: RoundState,
}

impl GameState {
    /// Seats the given players, deals secret roles, and shuffles a full deck.
    ///
    /// Identifiers must be distinct; their order fixes the seat order and the
    /// first seat holds the first presidency. Fails before any role is dealt
    /// when the table size is outside [`MIN_PLAYERS`]..=[`MAX_PLAYERS`].
    pub fn new(ids: &[PlayerId], rng: &mut impl Rng) -> Result<Self, StartError> {
        let count = ids.len();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
            return Err(StartError::InvalidPlayerCount { count });
        }

        let dealt = roles::deal(count, rng);
        let players = ids
            .iter()
            .zip(dealt)
            .map(|(&id, role)| PlayerState::new(id, role))
            .collect();

        Ok(Self {
            players,
            board: Board::default(),
            deck: PolicyDeck::new(rng),
            round: RoundState::first(),
        })
    }

    /// Identifier of the sitting president.
    pub fn president(&self) -> PlayerId {
        self.players[self.round.president_seat].id
    }

    /// Looks up a seated player.
    pub fn player(&self, id: PlayerId) -> Option<&PlayerState> {
        self.players.iter().find(|player| player.id == id)
    }

    /// Players still in the game, in seat order.
    pub fn living(&self) -> impl Iterator<Item = &PlayerState> {
        self.players.iter().filter(|player| player.alive)
    }

    pub fn living_count(&self) -> usize {
        self.living().count()
    }

    /// Players the sitting president may nominate for chancellor.
    pub fn eligible_nominees(&self) -> Vec<PlayerId> {
        nomination::eligible_nominees(
            &self.players,
            self.president(),
            self.round.prev_president,
            self.round.prev_chancellor,
        )
    }

    /// The win condition once the game has ended.
    pub fn winner(&self) -> Option<WinCondition> {
        match self.round.phase {
            RoundPhase::GameOver(win) => Some(win),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn ids(count: u32) -> Vec<PlayerId> {
        (0..count).map(PlayerId::new).collect()
    }

    #[test]
    fn rejects_tables_outside_the_player_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let err = GameState::new(&ids(4), &mut rng).unwrap_err();
        assert_eq!(err, StartError::InvalidPlayerCount { count: 4 });

        let err = GameState::new(&ids(11), &mut rng).unwrap_err();
        assert_eq!(err, StartError::InvalidPlayerCount { count: 11 });
    }

    #[test]
    fn fresh_game_starts_at_round_one_with_a_full_deck() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let state = GameState::new(&ids(5), &mut rng).unwrap();

        assert_eq!(state.round.number, 1);
        assert_eq!(state.round.phase, RoundPhase::Nomination);
        assert_eq!(state.president(), PlayerId::new(0));
        assert_eq!(state.board, Board::default());
        assert_eq!(state.deck.remaining(), FASCIST_POLICIES + LIBERAL_POLICIES);
        assert_eq!(state.living_count(), 5);
        assert_eq!(state.winner(), None);
    }

    #[test]
    fn first_round_excludes_only_the_president() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let state = GameState::new(&ids(5), &mut rng).unwrap();

        let eligible = state.eligible_nominees();
        assert_eq!(eligible.len(), 4);
        assert!(!eligible.contains(&state.president()));
    }
}
