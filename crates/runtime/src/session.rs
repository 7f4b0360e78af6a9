//! Game session task that owns the authoritative [`game_core::GameState`].
//!
//! One session per game. The session drives the phase cycle, blocks on the
//! [`InputSource`] for every player decision, enforces deadlines and retry
//! budgets, and publishes [`GameEvent`]s as the public record. All rule
//! decisions go through [`game_core::GameEngine`]; everything here is
//! sequencing, waiting, and messaging.
//!
//! Engine calls are synchronous and complete between awaits, so when an abort
//! cancels the session mid-wait the state it abandons is always consistent:
//! an enactment either fully happened or not at all.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use rand_chacha::ChaCha8Rng;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use game_core::{
    Ballot, Briefing, ElectionOutcome, EngineError, GameEngine, GameState, MIN_PLAYERS, Party,
    PlayerId, Role, RoundEnd, RoundPhase, WinCondition, roles,
};

use crate::api::{
    Audience, GameError, GameEvent, InputError, InputSource, Notifier, Severity,
};
use crate::registry::{GameId, RuntimeConfig};

pub(crate) struct GameSession {
    game: GameId,
    state: GameState,
    rng: ChaCha8Rng,
    config: RuntimeConfig,
    input: Arc<dyn InputSource>,
    notifier: Arc<dyn Notifier>,
    events: broadcast::Sender<GameEvent>,
}

impl GameSession {
    pub(crate) fn new(
        game: GameId,
        state: GameState,
        rng: ChaCha8Rng,
        config: RuntimeConfig,
        input: Arc<dyn InputSource>,
        notifier: Arc<dyn Notifier>,
        events: broadcast::Sender<GameEvent>,
    ) -> Self {
        Self {
            game,
            state,
            rng,
            config,
            input,
            notifier,
            events,
        }
    }

    /// Runs the game to a terminal state or until aborted.
    ///
    /// The whole play loop races against the abort signal, so an abort can
    /// interrupt any pending wait.
    pub(crate) async fn run(
        mut self,
        abort: watch::Receiver<bool>,
    ) -> Result<WinCondition, GameError> {
        info!(
            target: "runtime::session",
            game = %self.game,
            players = self.state.players.len(),
            "session started"
        );

        let outcome = tokio::select! {
            _ = aborted(abort) => Err(GameError::Aborted),
            outcome = self.play() => outcome,
        };

        match &outcome {
            Ok(win) => {
                info!(target: "runtime::session", game = %self.game, winner = %win.winning_party(), "game finished");
            }
            Err(GameError::Aborted) => {
                self.notifier
                    .notify(
                        Audience::Everyone,
                        "The game has been called off.",
                        Severity::Error,
                    )
                    .await;
                let _ = self.events.send(GameEvent::GameAborted);
                info!(target: "runtime::session", game = %self.game, "game aborted");
            }
            Err(err) => {
                warn!(target: "runtime::session", game = %self.game, error = %err, "game over without a verdict");
            }
        }
        outcome
    }

    async fn play(&mut self) -> Result<WinCondition, GameError> {
        self.deliver_briefings().await;
        let seated = self.state.players.len();
        self.notifier
            .notify(
                Audience::Everyone,
                &format!("The game begins with {seated} players."),
                Severity::Info,
            )
            .await;

        loop {
            let round = self.state.round.number;
            let president = self.state.president();
            let _ = self
                .events
                .send(GameEvent::RoundStarted { round, president });
            self.notifier
                .notify(
                    Audience::Everyone,
                    &format!("Round {round}: {president} holds the presidency."),
                    Severity::Info,
                )
                .await;

            // Nomination
            let Some(nominee) = self.request_nomination(president).await? else {
                self.forfeit("no chancellor was nominated").await;
                continue;
            };
            let _ = self
                .events
                .send(GameEvent::NominationMade { president, nominee });
            self.notifier
                .notify(
                    Audience::Everyone,
                    &format!("{president} nominates {nominee} for chancellor. Cast your votes."),
                    Severity::Info,
                )
                .await;

            // Election
            let (ballots, gone) = self.collect_ballots(nominee).await;
            for voter in gone {
                self.remove(voter).await?;
            }
            let standing = |id: PlayerId| self.state.player(id).is_some_and(|p| p.alive);
            if !standing(president) || !standing(nominee) {
                self.forfeit("the proposed government fell apart").await;
                continue;
            }

            let yes = ballots.iter().filter(|ballot| ballot.yes).count();
            let no = ballots.len() - yes;
            let outcome = GameEngine::new(&mut self.state)
                .resolve_election(&ballots, &mut self.rng)
                .expect("ballots resolve in the election phase");
            let confirmed = !matches!(outcome, ElectionOutcome::Rejected { .. });
            let _ = self.events.send(GameEvent::ElectionResolved {
                nominee,
                yes,
                no,
                confirmed,
            });

            let chancellor = match outcome {
                ElectionOutcome::Rejected { rebuilt } => {
                    self.notifier
                        .notify(
                            Audience::Everyone,
                            &format!("The vote fails, {yes} in favor to {no} against. The presidency passes."),
                            Severity::Warn,
                        )
                        .await;
                    if rebuilt {
                        self.announce_rebuild().await;
                    }
                    continue;
                }
                ElectionOutcome::GameOver(win) => {
                    self.notifier
                        .notify(
                            Audience::Everyone,
                            &format!("The vote passes. {nominee} is chancellor."),
                            Severity::Success,
                        )
                        .await;
                    return self.finish(win).await;
                }
                ElectionOutcome::Confirmed { chancellor } => {
                    self.notifier
                        .notify(
                            Audience::Everyone,
                            &format!("The vote passes, {yes} in favor to {no} against. {chancellor} is chancellor."),
                            Severity::Success,
                        )
                        .await;
                    chancellor
                }
            };

            // Presidential legislation
            let RoundPhase::PresidentLegislation { hand } = self.state.round.phase else {
                unreachable!("confirmed election enters presidential legislation");
            };
            let forwarded = self
                .request_policy_choice(president, hand.to_vec(), 2, |state, picks| {
                    GameEngine::new(state).forward_policies(picks)
                })
                .await?;
            let Some(forwarded) = forwarded else {
                self.forfeit("the president abandoned the legislative session")
                    .await;
                continue;
            };

            // Chancellor legislation
            let enactment = self
                .request_policy_choice(chancellor, forwarded.to_vec(), 1, |state, picks| {
                    match *picks {
                        [pick] => GameEngine::new(state).enact_policy(pick),
                        _ => Err(EngineError::InvalidSelection {
                            picks: picks.to_vec(),
                            hand_size: forwarded.len(),
                        }),
                    }
                })
                .await?;
            let Some(enactment) = enactment else {
                self.forfeit("the chancellor abandoned the legislative session")
                    .await;
                continue;
            };

            let _ = self.events.send(GameEvent::PolicyEnacted {
                party: enactment.party,
                liberal: enactment.liberal,
                fascist: enactment.fascist,
            });
            self.notifier
                .notify(
                    Audience::Everyone,
                    &format!("A {} policy is enacted.", enactment.party),
                    Severity::Success,
                )
                .await;

            // Summary
            match GameEngine::new(&mut self.state)
                .conclude_round(&mut self.rng)
                .expect("summary follows an enactment")
            {
                RoundEnd::GameOver(win) => return self.finish(win).await,
                RoundEnd::Continue { rebuilt } => {
                    let board = self.state.board;
                    self.notifier
                        .notify(
                            Audience::Everyone,
                            &format!(
                                "{} liberal and {} fascist policies are law.",
                                board.liberal, board.fascist
                            ),
                            Severity::Info,
                        )
                        .await;
                    if rebuilt {
                        self.announce_rebuild().await;
                    }
                }
            }
        }
    }

    /// Sends every player their role and whatever their role lets them know.
    /// Private channels only; nothing here reaches the shared record.
    async fn deliver_briefings(&self) {
        for briefing in roles::briefings(&self.state.players) {
            let text = briefing_text(&briefing);
            self.notifier
                .notify(Audience::Player(briefing.player), &text, Severity::Info)
                .await;
        }
    }

    /// Asks the president for a nominee until one is legal or the budget runs
    /// out. `Ok(None)` means the round should be forfeited.
    async fn request_nomination(
        &mut self,
        president: PlayerId,
    ) -> Result<Option<PlayerId>, GameError> {
        let allowed = self.config.nomination_timeout;
        for _ in 0..=self.config.retry_limit {
            let eligible = self.state.eligible_nominees();
            let choice = deadline(allowed, self.input.nomination(president, &eligible, allowed)).await;
            match choice {
                Ok(choice) => match GameEngine::new(&mut self.state).nominate(choice) {
                    Ok(()) => return Ok(Some(choice)),
                    Err(
                        err @ (EngineError::IneligibleNominee { .. }
                        | EngineError::UnknownPlayer { .. }),
                    ) => {
                        debug!(target: "runtime::session", game = %self.game, error = %err, "rejected nomination");
                        self.notifier
                            .notify(
                                Audience::Player(president),
                                &format!("{choice} cannot serve as chancellor this round. Choose again."),
                                Severity::Error,
                            )
                            .await;
                    }
                    Err(err) => unreachable!("nomination rejected in the nomination phase: {err}"),
                },
                Err(InputError::Timeout) => return Ok(None),
                Err(InputError::Disconnected) => {
                    self.remove(president).await?;
                    return Ok(None);
                }
            }
        }
        Ok(None)
    }

    /// Collects one ballot per living player, all in parallel under the same
    /// deadline. Missing answers become "no" votes; disconnected voters are
    /// reported for removal after their defaulted ballot is counted.
    async fn collect_ballots(&self, nominee: PlayerId) -> (Vec<Ballot>, Vec<PlayerId>) {
        let allowed = self.config.vote_timeout;
        let requests = self.state.living().map(|player| {
            let voter = player.id;
            let input = Arc::clone(&self.input);
            async move { (voter, deadline(allowed, input.vote(voter, nominee, allowed)).await) }
        });
        let responses = futures::future::join_all(requests).await;

        let mut ballots = Vec::with_capacity(responses.len());
        let mut gone = Vec::new();
        for (voter, response) in responses {
            let yes = match response {
                Ok(yes) => yes,
                Err(InputError::Timeout) => false,
                Err(InputError::Disconnected) => {
                    gone.push(voter);
                    false
                }
            };
            ballots.push(Ballot::new(voter, yes));
        }
        (ballots, gone)
    }

    /// Asks `chooser` to pick `choose` cards from `cards` until the engine
    /// accepts the selection or the budget runs out. `Ok(None)` means the
    /// round should be forfeited.
    async fn request_policy_choice<T>(
        &mut self,
        chooser: PlayerId,
        cards: Vec<Party>,
        choose: usize,
        mut apply: impl FnMut(&mut GameState, &[usize]) -> Result<T, EngineError>,
    ) -> Result<Option<T>, GameError> {
        let allowed = self.config.policy_timeout;
        for _ in 0..=self.config.retry_limit {
            let picks = deadline(
                allowed,
                self.input.policy_choice(chooser, &cards, choose, allowed),
            )
            .await;
            match picks {
                Ok(picks) => match apply(&mut self.state, &picks) {
                    Ok(value) => return Ok(Some(value)),
                    Err(err @ EngineError::InvalidSelection { .. }) => {
                        debug!(target: "runtime::session", game = %self.game, error = %err, "rejected card selection");
                        self.notifier
                            .notify(
                                Audience::Player(chooser),
                                "That selection is not valid. Choose again.",
                                Severity::Error,
                            )
                            .await;
                    }
                    Err(err) => unreachable!("card selection rejected mid-legislation: {err}"),
                },
                Err(InputError::Timeout) => return Ok(None),
                Err(InputError::Disconnected) => {
                    self.remove(chooser).await?;
                    return Ok(None);
                }
            }
        }
        Ok(None)
    }

    /// Abandons the current round and passes the presidency.
    async fn forfeit(&mut self, reason: &str) {
        let round = self.state.round.number;
        warn!(target: "runtime::session", game = %self.game, round, reason, "round forfeited");
        self.notifier
            .notify(
                Audience::Everyone,
                &format!("Round {round} is forfeit: {reason}. The presidency passes."),
                Severity::Warn,
            )
            .await;
        let _ = self.events.send(GameEvent::RoundForfeited { round });

        let rebuilt = GameEngine::new(&mut self.state)
            .forfeit_round(&mut self.rng)
            .expect("forfeit is legal in any non-terminal phase");
        if rebuilt {
            self.announce_rebuild().await;
        }
    }

    /// Takes a player out of the game; fatal once the table is too small.
    async fn remove(&mut self, player: PlayerId) -> Result<(), GameError> {
        let living = GameEngine::new(&mut self.state)
            .remove_player(player)
            .expect("removed player is seated");
        warn!(target: "runtime::session", game = %self.game, %player, living, "player removed");
        let _ = self.events.send(GameEvent::PlayerRemoved { player, living });
        self.notifier
            .notify(
                Audience::Everyone,
                &format!("{player} has left the game."),
                Severity::Warn,
            )
            .await;

        if living < MIN_PLAYERS {
            self.notifier
                .notify(
                    Audience::Everyone,
                    "Too few players remain to continue.",
                    Severity::Error,
                )
                .await;
            return Err(GameError::InsufficientPlayers { living });
        }
        Ok(())
    }

    async fn announce_rebuild(&mut self) {
        let remaining = self.state.deck.remaining();
        debug!(target: "runtime::session", game = %self.game, remaining, "deck rebuilt");
        let _ = self.events.send(GameEvent::DeckRebuilt { remaining });
        self.notifier
            .notify(
                Audience::Everyone,
                "The policy deck has been reshuffled.",
                Severity::Info,
            )
            .await;
    }

    async fn finish(&mut self, win: WinCondition) -> Result<WinCondition, GameError> {
        let winner = win.winning_party();
        let _ = self.events.send(GameEvent::GameEnded { win, winner });
        let text = match win {
            WinCondition::LiberalTrack => "Five liberal policies are law. The liberals win.",
            WinCondition::FascistTrack => "Six fascist policies are law. The fascists win.",
            WinCondition::HitlerChancellor => {
                "Hitler controls the chancellorship. The fascists win."
            }
        };
        self.notifier
            .notify(Audience::Everyone, text, Severity::Success)
            .await;
        Ok(win)
    }
}

fn briefing_text(briefing: &Briefing) -> String {
    let mut text = format!("You are {}.", briefing.role);
    if !briefing.known_fascists.is_empty() {
        let fellows = briefing
            .known_fascists
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        if briefing.role == Role::Hitler {
            text.push_str(&format!(" Your fellow fascist is {fellows}."));
        } else {
            text.push_str(&format!(" Your fellow fascists: {fellows}."));
        }
    }
    if let Some(hitler) = briefing.known_hitler {
        text.push_str(&format!(" {hitler} is Hitler."));
    }
    text
}

/// Bounds a request with the session's own timer, so a misbehaving
/// [`InputSource`] cannot stall the game past the allowed time.
async fn deadline<T>(
    allowed: Duration,
    request: impl Future<Output = Result<T, InputError>>,
) -> Result<T, InputError> {
    match tokio::time::timeout(allowed, request).await {
        Ok(response) => response,
        Err(_) => Err(InputError::Timeout),
    }
}

/// Resolves only when an abort is explicitly signalled. A dropped sender
/// parks forever so the game keeps running.
async fn aborted(mut signal: watch::Receiver<bool>) {
    loop {
        if *signal.borrow() {
            return;
        }
        if signal.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
