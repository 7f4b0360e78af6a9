//! Policy draw pile.

use rand::Rng;
use rand::seq::SliceRandom;

use super::board::Board;
use super::player::Party;

/// Fascist policy cards in a full deck.
pub const FASCIST_POLICIES: usize = 11;

/// Liberal policy cards in a full deck.
pub const LIBERAL_POLICIES: usize = 6;

/// Cards the president draws each legislative round. Doubles as the rebuild
/// threshold: a deck that cannot cover a full draw is rebuilt between rounds.
pub const PRESIDENT_DRAW: usize = 3;

/// Shuffled pile of policy cards.
///
/// There is no separate discard pile. Cards that leave play (the president's
/// discard, the chancellor's discard, hands lost to a forfeited round) are
/// recovered by [`PolicyDeck::rebuild`], which deals a fresh pile containing
/// every card not yet enacted on the board. That is arithmetically the same as
/// shuffling the discards back in.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PolicyDeck {
    /// Draw pile; the top of the deck is the end of the vector.
    cards: Vec<Party>,
}

impl PolicyDeck {
    /// Deals a full 17-card deck for an empty board.
    pub fn new(rng: &mut impl Rng) -> Self {
        let mut deck = Self { cards: Vec::new() };
        deck.rebuild(&Board::default(), rng);
        deck
    }

    /// Cards left in the draw pile.
    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    /// True when the pile cannot cover the next presidential draw.
    ///
    /// Checked between rounds only; the deck is never rebuilt mid-round.
    pub fn needs_rebuild(&self) -> bool {
        self.cards.len() < PRESIDENT_DRAW
    }

    /// Draws the top `N` cards.
    ///
    /// Fails without disturbing the pile when fewer than `N` cards remain.
    pub fn draw<const N: usize>(&mut self) -> Result<[Party; N], DeckError> {
        if self.cards.len() < N {
            return Err(DeckError::InsufficientCards {
                requested: N,
                remaining: self.cards.len(),
            });
        }
        let top = self.cards.split_off(self.cards.len() - N);
        let mut drawn = [Party::Liberal; N];
        drawn.copy_from_slice(&top);
        Ok(drawn)
    }

    /// Replaces the pile with every card not enacted on `board`, reshuffled.
    pub fn rebuild(&mut self, board: &Board, rng: &mut impl Rng) {
        let fascist = FASCIST_POLICIES - board.fascist as usize;
        let liberal = LIBERAL_POLICIES - board.liberal as usize;

        self.cards.clear();
        self.cards
            .extend(std::iter::repeat(Party::Fascist).take(fascist));
        self.cards
            .extend(std::iter::repeat(Party::Liberal).take(liberal));
        self.cards.shuffle(rng);
    }
}

/// Errors raised by deck operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeckError {
    #[error("cannot draw {requested} cards from a pile of {remaining}")]
    InsufficientCards { requested: usize, remaining: usize },
}
