//! Round phase machine and decision validation.
//!
//! The [`GameEngine`] is the authoritative reducer for [`GameState`]. One
//! method per decision point, each validating the phase and the player input
//! before mutating anything. Waiting on players, deadlines, and retries all
//! live in the async layer above; by the time a decision reaches the engine it
//! is applied in a single synchronous step.

mod errors;

pub use errors::EngineError;

use rand::Rng;

use crate::state::{GameState, PRESIDENT_DRAW, Party, PlayerId, Role, RoundPhase, WinCondition};

/// One player's vote on the proposed government.
///
/// Ballots reach the engine already defaulted: the layer collecting votes
/// substitutes a "no" for every voter who failed to answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ballot {
    pub voter: PlayerId,
    pub yes: bool,
}

impl Ballot {
    pub const fn new(voter: PlayerId, yes: bool) -> Self {
        Self { voter, yes }
    }
}

/// Result of resolving an election.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElectionOutcome {
    /// Strict majority in favor; the presidential hand has been drawn.
    Confirmed { chancellor: PlayerId },
    /// No majority. The presidency has already passed to the next seat.
    Rejected { rebuilt: bool },
    /// Hitler was confirmed chancellor late in the game. Terminal.
    GameOver(WinCondition),
}

/// A policy placed on the board, with the updated totals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Enactment {
    pub party: Party,
    pub liberal: u8,
    pub fascist: u8,
}

/// Result of concluding a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoundEnd {
    /// A track is complete. Terminal.
    GameOver(WinCondition),
    /// Next round has begun; `rebuilt` reports a deck rebuild at the boundary.
    Continue { rebuilt: bool },
}

/// Authoritative reducer over a borrowed [`GameState`].
///
/// Construction is cheap; callers build one per decision. Methods that can
/// cross a round boundary take an RNG because the deck may be rebuilt there.
pub struct GameEngine<'a> {
    state: &'a mut GameState,
}

impl<'a> GameEngine<'a> {
    pub fn new(state: &'a mut GameState) -> Self {
        Self { state }
    }

    /// Puts the president's chancellor candidate up for election.
    pub fn nominate(&mut self, nominee: PlayerId) -> Result<(), EngineError> {
        let RoundPhase::Nomination = self.state.round.phase else {
            return Err(self.wrong_phase("nominate"));
        };
        if self.state.player(nominee).is_none() {
            return Err(EngineError::UnknownPlayer { player: nominee });
        }
        if !self.state.eligible_nominees().contains(&nominee) {
            return Err(EngineError::IneligibleNominee { nominee });
        }

        self.state.round.phase = RoundPhase::Election { nominee };
        Ok(())
    }

    /// Tallies the election and advances the game accordingly.
    ///
    /// Confirmation needs a strict majority of the submitted ballots, so a tie
    /// fails. A confirmed Hitler ends the game before any card is drawn once
    /// the board has reached the late-game threshold. A failed election passes
    /// the presidency without touching the term-limit memory.
    pub fn resolve_election(
        &mut self,
        ballots: &[Ballot],
        rng: &mut impl Rng,
    ) -> Result<ElectionOutcome, EngineError> {
        let RoundPhase::Election { nominee } = self.state.round.phase else {
            return Err(self.wrong_phase("resolve_election"));
        };

        let yes = ballots.iter().filter(|ballot| ballot.yes).count();
        if yes * 2 <= ballots.len() {
            let rebuilt = self.next_round(rng);
            return Ok(ElectionOutcome::Rejected { rebuilt });
        }

        let role = self.state.player(nominee).map(|player| player.role);
        if self.state.board.hitler_chancellor_wins() && role == Some(Role::Hitler) {
            self.state.round.phase = RoundPhase::GameOver(WinCondition::HitlerChancellor);
            return Ok(ElectionOutcome::GameOver(WinCondition::HitlerChancellor));
        }

        self.state.round.chancellor = Some(nominee);
        let hand = self
            .state
            .deck
            .draw::<PRESIDENT_DRAW>()
            .expect("deck is rebuilt at every round boundary and covers a presidential draw");
        self.state.round.phase = RoundPhase::PresidentLegislation { hand };
        Ok(ElectionOutcome::Confirmed { chancellor: nominee })
    }

    /// Applies the president's discard, forwarding the other two cards.
    ///
    /// `picks` are indices into the drawn hand: exactly two, distinct, in
    /// range. The unpicked card leaves play until a rebuild recovers it.
    pub fn forward_policies(&mut self, picks: &[usize]) -> Result<[Party; 2], EngineError> {
        let RoundPhase::PresidentLegislation { hand } = self.state.round.phase else {
            return Err(self.wrong_phase("forward_policies"));
        };

        let valid =
            picks.len() == 2 && picks[0] != picks[1] && picks.iter().all(|&pick| pick < hand.len());
        if !valid {
            return Err(EngineError::InvalidSelection {
                picks: picks.to_vec(),
                hand_size: hand.len(),
            });
        }

        let forwarded = [hand[picks[0]], hand[picks[1]]];
        self.state.round.phase = RoundPhase::ChancellorLegislation { forwarded };
        Ok(forwarded)
    }

    /// Applies the chancellor's choice, placing the card on the board.
    pub fn enact_policy(&mut self, pick: usize) -> Result<Enactment, EngineError> {
        let RoundPhase::ChancellorLegislation { forwarded } = self.state.round.phase else {
            return Err(self.wrong_phase("enact_policy"));
        };
        let Some(&card) = forwarded.get(pick) else {
            return Err(EngineError::InvalidSelection {
                picks: vec![pick],
                hand_size: forwarded.len(),
            });
        };

        let (liberal, fascist) = self.state.board.enact(card);
        self.state.round.phase = RoundPhase::Summary { enacted: card };
        Ok(Enactment {
            party: card,
            liberal,
            fascist,
        })
    }

    /// Closes the round: win check first, then the boundary work.
    ///
    /// When the game continues, the successful government is recorded for the
    /// next round's term limits, the deck is rebuilt if it cannot cover a full
    /// draw, and the presidency passes to the next living seat.
    pub fn conclude_round(&mut self, rng: &mut impl Rng) -> Result<RoundEnd, EngineError> {
        let RoundPhase::Summary { .. } = self.state.round.phase else {
            return Err(self.wrong_phase("conclude_round"));
        };

        if let Some(win) = self.state.board.check_win() {
            self.state.round.phase = RoundPhase::GameOver(win);
            return Ok(RoundEnd::GameOver(win));
        }

        self.state.round.prev_president = Some(self.state.president());
        self.state.round.prev_chancellor = self.state.round.chancellor;
        let rebuilt = self.next_round(rng);
        Ok(RoundEnd::Continue { rebuilt })
    }

    /// Abandons the round without an enactment.
    ///
    /// Shared exit for failed nominations, expired deadlines, and exhausted
    /// retries. The presidency passes but the term-limit memory keeps the last
    /// successful government. Returns whether the deck was rebuilt.
    pub fn forfeit_round(&mut self, rng: &mut impl Rng) -> Result<bool, EngineError> {
        if let RoundPhase::GameOver(_) = self.state.round.phase {
            return Err(self.wrong_phase("forfeit_round"));
        }
        Ok(self.next_round(rng))
    }

    /// Marks a player as permanently out of the game.
    ///
    /// Idempotent. Returns the remaining living count; deciding whether that
    /// is still enough to keep playing belongs to the caller.
    pub fn remove_player(&mut self, player: PlayerId) -> Result<usize, EngineError> {
        let Some(found) = self.state.players.iter_mut().find(|seat| seat.id == player) else {
            return Err(EngineError::UnknownPlayer { player });
        };
        found.alive = false;
        Ok(self.state.living_count())
    }

    /// Crosses a round boundary. Returns whether the deck was rebuilt.
    fn next_round(&mut self, rng: &mut impl Rng) -> bool {
        let rebuilt = self.state.deck.needs_rebuild();
        if rebuilt {
            self.state.deck.rebuild(&self.state.board, rng);
        }

        let round = &mut self.state.round;
        round.chancellor = None;
        round.number += 1;
        round.phase = RoundPhase::Nomination;
        self.advance_presidency();
        rebuilt
    }

    /// Moves the presidency to the next living seat.
    ///
    /// At least one living seat is guaranteed while the game is running.
    fn advance_presidency(&mut self) {
        let players = &self.state.players;
        let mut seat = self.state.round.president_seat;
        loop {
            seat = (seat + 1) % players.len();
            if players[seat].alive {
                break;
            }
        }
        self.state.round.president_seat = seat;
    }

    fn wrong_phase(&self, operation: &'static str) -> EngineError {
        EngineError::WrongPhase {
            operation,
            phase: self.state.round.phase.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::state::{Board, FASCIST_POLICIES, LIBERAL_POLICIES};

    use super::*;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    /// Seats `roles.len()` players and pins their roles so tests do not depend
    /// on what the dealer happened to shuffle.
    fn game(roles: &[Role]) -> GameState {
        let ids: Vec<PlayerId> = (0..roles.len() as u32).map(PlayerId::new).collect();
        let mut state = GameState::new(&ids, &mut rng()).unwrap();
        for (player, &role) in state.players.iter_mut().zip(roles) {
            player.role = role;
        }
        state
    }

    fn liberal_table(count: usize) -> GameState {
        game(&vec![Role::Liberal; count])
    }

    /// One ballot per living player, the first `yes` of them in favor.
    fn ballots(state: &GameState, yes: usize) -> Vec<Ballot> {
        state
            .living()
            .enumerate()
            .map(|(index, player)| Ballot::new(player.id, index < yes))
            .collect()
    }

    #[test]
    fn nominate_moves_to_election() {
        let mut state = liberal_table(5);
        let nominee = PlayerId::new(2);

        GameEngine::new(&mut state).nominate(nominee).unwrap();

        assert_eq!(state.round.phase, RoundPhase::Election { nominee });
    }

    #[test]
    fn nominate_rejects_the_president_and_strangers() {
        let mut state = liberal_table(5);
        let president = state.president();

        let err = GameEngine::new(&mut state).nominate(president).unwrap_err();
        assert_eq!(err, EngineError::IneligibleNominee { nominee: president });

        let stranger = PlayerId::new(99);
        let err = GameEngine::new(&mut state).nominate(stranger).unwrap_err();
        assert_eq!(err, EngineError::UnknownPlayer { player: stranger });

        assert_eq!(state.round.phase, RoundPhase::Nomination);
    }

    #[test]
    fn nominate_outside_nomination_phase_is_a_sequencing_error() {
        let mut state = liberal_table(5);
        GameEngine::new(&mut state)
            .nominate(PlayerId::new(1))
            .unwrap();

        let err = GameEngine::new(&mut state)
            .nominate(PlayerId::new(2))
            .unwrap_err();
        assert!(matches!(err, EngineError::WrongPhase { .. }));
    }

    #[test]
    fn minority_vote_fails_and_passes_the_presidency() {
        let mut state = liberal_table(5);
        GameEngine::new(&mut state)
            .nominate(PlayerId::new(2))
            .unwrap();

        let votes = ballots(&state, 2);
        let outcome = GameEngine::new(&mut state)
            .resolve_election(&votes, &mut rng())
            .unwrap();

        assert_eq!(outcome, ElectionOutcome::Rejected { rebuilt: false });
        assert_eq!(state.round.number, 2);
        assert_eq!(state.round.phase, RoundPhase::Nomination);
        assert_eq!(state.president(), PlayerId::new(1));
        assert_eq!(state.board, Board::default());
        assert_eq!(state.round.prev_president, None);
        assert_eq!(state.round.prev_chancellor, None);
        assert_eq!(state.deck.remaining(), FASCIST_POLICIES + LIBERAL_POLICIES);
    }

    #[test]
    fn tie_votes_fail() {
        let mut state = liberal_table(6);
        GameEngine::new(&mut state)
            .nominate(PlayerId::new(2))
            .unwrap();

        let votes = ballots(&state, 3);
        let outcome = GameEngine::new(&mut state)
            .resolve_election(&votes, &mut rng())
            .unwrap();

        assert_eq!(outcome, ElectionOutcome::Rejected { rebuilt: false });
    }

    #[test]
    fn majority_vote_confirms_and_draws_the_presidential_hand() {
        let mut state = liberal_table(5);
        let nominee = PlayerId::new(2);
        GameEngine::new(&mut state).nominate(nominee).unwrap();

        let votes = ballots(&state, 3);
        let outcome = GameEngine::new(&mut state)
            .resolve_election(&votes, &mut rng())
            .unwrap();

        assert_eq!(outcome, ElectionOutcome::Confirmed { chancellor: nominee });
        assert_eq!(state.round.chancellor, Some(nominee));
        assert_eq!(state.deck.remaining(), 14);
        assert!(matches!(
            state.round.phase,
            RoundPhase::PresidentLegislation { .. }
        ));
    }

    #[test]
    fn confirmed_hitler_ends_the_game_before_any_draw() {
        let mut state = game(&[
            Role::Liberal,
            Role::Hitler,
            Role::Fascist,
            Role::Liberal,
            Role::Liberal,
        ]);
        state.board.fascist = 3;
        let hitler = PlayerId::new(1);

        GameEngine::new(&mut state).nominate(hitler).unwrap();
        let votes = ballots(&state, 5);
        let outcome = GameEngine::new(&mut state)
            .resolve_election(&votes, &mut rng())
            .unwrap();

        assert_eq!(
            outcome,
            ElectionOutcome::GameOver(WinCondition::HitlerChancellor)
        );
        assert_eq!(state.winner(), Some(WinCondition::HitlerChancellor));
        // The hand was never drawn.
        assert_eq!(state.deck.remaining(), FASCIST_POLICIES + LIBERAL_POLICIES);
        assert_eq!(state.round.chancellor, None);
    }

    #[test]
    fn confirmed_hitler_below_the_threshold_is_an_ordinary_chancellor() {
        let mut state = game(&[
            Role::Liberal,
            Role::Hitler,
            Role::Fascist,
            Role::Liberal,
            Role::Liberal,
        ]);
        state.board.fascist = 2;
        let hitler = PlayerId::new(1);

        GameEngine::new(&mut state).nominate(hitler).unwrap();
        let votes = ballots(&state, 5);
        let outcome = GameEngine::new(&mut state)
            .resolve_election(&votes, &mut rng())
            .unwrap();

        assert_eq!(outcome, ElectionOutcome::Confirmed { chancellor: hitler });
    }

    #[test]
    fn forward_policies_validates_the_selection() {
        let mut state = liberal_table(5);
        GameEngine::new(&mut state)
            .nominate(PlayerId::new(2))
            .unwrap();
        let votes = ballots(&state, 5);
        GameEngine::new(&mut state)
            .resolve_election(&votes, &mut rng())
            .unwrap();

        for picks in [&[0, 0][..], &[0, 3][..], &[0][..], &[0, 1, 2][..]] {
            let err = GameEngine::new(&mut state)
                .forward_policies(picks)
                .unwrap_err();
            assert!(
                matches!(err, EngineError::InvalidSelection { .. }),
                "picks {picks:?}"
            );
        }

        let RoundPhase::PresidentLegislation { hand } = state.round.phase else {
            panic!("expected presidential legislation");
        };
        let forwarded = GameEngine::new(&mut state).forward_policies(&[2, 0]).unwrap();
        assert_eq!(forwarded, [hand[2], hand[0]]);
        assert_eq!(
            state.round.phase,
            RoundPhase::ChancellorLegislation { forwarded }
        );
    }

    #[test]
    fn enact_policy_updates_the_board_and_enters_summary() {
        let mut state = liberal_table(5);
        GameEngine::new(&mut state)
            .nominate(PlayerId::new(2))
            .unwrap();
        let votes = ballots(&state, 5);
        GameEngine::new(&mut state)
            .resolve_election(&votes, &mut rng())
            .unwrap();
        let forwarded = GameEngine::new(&mut state)
            .forward_policies(&[0, 1])
            .unwrap();

        let err = GameEngine::new(&mut state).enact_policy(2).unwrap_err();
        assert!(matches!(err, EngineError::InvalidSelection { .. }));

        let enactment = GameEngine::new(&mut state).enact_policy(1).unwrap();
        assert_eq!(enactment.party, forwarded[1]);
        assert_eq!(
            state.board.liberal + state.board.fascist,
            1,
            "exactly one policy on the board"
        );
        assert_eq!(
            state.round.phase,
            RoundPhase::Summary {
                enacted: forwarded[1]
            }
        );
    }

    #[test]
    fn conclude_round_records_the_government_and_rotates() {
        let mut state = liberal_table(5);
        let president = state.president();
        let nominee = PlayerId::new(2);
        GameEngine::new(&mut state).nominate(nominee).unwrap();
        let votes = ballots(&state, 5);
        GameEngine::new(&mut state)
            .resolve_election(&votes, &mut rng())
            .unwrap();
        GameEngine::new(&mut state)
            .forward_policies(&[0, 1])
            .unwrap();
        GameEngine::new(&mut state).enact_policy(0).unwrap();

        let end = GameEngine::new(&mut state)
            .conclude_round(&mut rng())
            .unwrap();

        assert_eq!(end, RoundEnd::Continue { rebuilt: false });
        assert_eq!(state.round.number, 2);
        assert_eq!(state.round.phase, RoundPhase::Nomination);
        assert_eq!(state.round.prev_president, Some(president));
        assert_eq!(state.round.prev_chancellor, Some(nominee));
        assert_eq!(state.round.chancellor, None);
        assert_eq!(state.president(), PlayerId::new(1));

        let eligible = state.eligible_nominees();
        assert!(!eligible.contains(&president));
        assert!(!eligible.contains(&nominee));
        assert!(!eligible.contains(&state.president()));
    }

    #[test]
    fn fifth_liberal_policy_ends_the_game_at_conclusion() {
        let mut state = liberal_table(5);
        state.board.liberal = 4;
        GameEngine::new(&mut state)
            .nominate(PlayerId::new(2))
            .unwrap();
        let votes = ballots(&state, 5);
        GameEngine::new(&mut state)
            .resolve_election(&votes, &mut rng())
            .unwrap();

        // Force a liberal pair regardless of the shuffle.
        state.round.phase = RoundPhase::ChancellorLegislation {
            forwarded: [Party::Liberal, Party::Liberal],
        };
        GameEngine::new(&mut state).enact_policy(0).unwrap();

        let end = GameEngine::new(&mut state)
            .conclude_round(&mut rng())
            .unwrap();
        assert_eq!(end, RoundEnd::GameOver(WinCondition::LiberalTrack));
        assert_eq!(state.winner(), Some(WinCondition::LiberalTrack));
    }

    #[test]
    fn sixth_fascist_policy_ends_the_game_at_conclusion() {
        let mut state = liberal_table(5);
        state.board.fascist = 6;
        state.round.phase = RoundPhase::Summary {
            enacted: Party::Fascist,
        };

        let end = GameEngine::new(&mut state)
            .conclude_round(&mut rng())
            .unwrap();
        assert_eq!(end, RoundEnd::GameOver(WinCondition::FascistTrack));
    }

    #[test]
    fn no_operation_is_legal_after_the_game_ends() {
        let mut state = liberal_table(5);
        state.round.phase = RoundPhase::GameOver(WinCondition::LiberalTrack);

        assert!(matches!(
            GameEngine::new(&mut state).nominate(PlayerId::new(1)),
            Err(EngineError::WrongPhase { .. })
        ));
        assert!(matches!(
            GameEngine::new(&mut state).forfeit_round(&mut rng()),
            Err(EngineError::WrongPhase { .. })
        ));
    }

    #[test]
    fn forfeit_passes_the_presidency_without_touching_term_limits() {
        let mut state = liberal_table(5);
        state.round.prev_president = Some(PlayerId::new(4));
        state.round.prev_chancellor = Some(PlayerId::new(3));

        let rebuilt = GameEngine::new(&mut state)
            .forfeit_round(&mut rng())
            .unwrap();

        assert!(!rebuilt);
        assert_eq!(state.round.number, 2);
        assert_eq!(state.president(), PlayerId::new(1));
        assert_eq!(state.round.prev_president, Some(PlayerId::new(4)));
        assert_eq!(state.round.prev_chancellor, Some(PlayerId::new(3)));
    }

    #[test]
    fn round_boundaries_rebuild_a_short_deck() {
        let mut state = liberal_table(5);
        for _ in 0..5 {
            state.deck.draw::<3>().unwrap();
        }
        assert_eq!(state.deck.remaining(), 2);

        let rebuilt = GameEngine::new(&mut state)
            .forfeit_round(&mut rng())
            .unwrap();

        assert!(rebuilt);
        assert_eq!(state.deck.remaining(), FASCIST_POLICIES + LIBERAL_POLICIES);
    }

    #[test]
    fn rotation_skips_removed_seats() {
        let mut state = liberal_table(5);
        let living = GameEngine::new(&mut state)
            .remove_player(PlayerId::new(1))
            .unwrap();
        assert_eq!(living, 4);

        GameEngine::new(&mut state).forfeit_round(&mut rng()).unwrap();
        assert_eq!(state.president(), PlayerId::new(2));
    }

    #[test]
    fn remove_player_is_idempotent_and_checks_the_seat() {
        let mut state = liberal_table(5);
        let player = PlayerId::new(3);

        assert_eq!(GameEngine::new(&mut state).remove_player(player), Ok(4));
        assert_eq!(GameEngine::new(&mut state).remove_player(player), Ok(4));

        let stranger = PlayerId::new(9);
        assert_eq!(
            GameEngine::new(&mut state).remove_player(stranger),
            Err(EngineError::UnknownPlayer { player: stranger })
        );
    }

    /// Drives whole rounds through the engine with compliant players. Every
    /// round enacts a policy, so some track must fill within ten rounds.
    #[test]
    fn compliant_table_reaches_a_verdict_within_ten_rounds() {
        let mut state = game(&[
            Role::Hitler,
            Role::Fascist,
            Role::Liberal,
            Role::Liberal,
            Role::Liberal,
            Role::Liberal,
            Role::Liberal,
        ]);
        let mut rng = rng();

        for _ in 0..10 {
            let nominee = state.eligible_nominees()[0];
            GameEngine::new(&mut state).nominate(nominee).unwrap();

            let votes = ballots(&state, state.living_count());
            match GameEngine::new(&mut state)
                .resolve_election(&votes, &mut rng)
                .unwrap()
            {
                ElectionOutcome::GameOver(_) => break,
                ElectionOutcome::Confirmed { .. } => {}
                ElectionOutcome::Rejected { .. } => panic!("unanimous vote rejected"),
            }

            GameEngine::new(&mut state)
                .forward_policies(&[0, 1])
                .unwrap();
            GameEngine::new(&mut state).enact_policy(0).unwrap();

            if let RoundEnd::GameOver(_) = GameEngine::new(&mut state)
                .conclude_round(&mut rng)
                .unwrap()
            {
                break;
            }
        }

        assert!(state.winner().is_some(), "game must be decided by round ten");
    }
}
