//! Game registry that launches and tracks concurrent sessions.
//!
//! The [`GameRegistry`] implements the Registry pattern for live games: each
//! launch spawns an independent session task, and the registry keeps just
//! enough of a handle on it (abort signal, event channel) to reach it later.
//! Games remove themselves from the registry when they finish.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::sync::{Mutex, broadcast, watch};
use tokio::task::JoinHandle;
use tracing::info;

use game_core::{GameState, PlayerId, WinCondition};

use crate::api::{GameError, GameEvent, InputSource, Notifier, RegistryError, Result};
use crate::session::GameSession;

/// Identifies one running (or finished) game within a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GameId(pub u64);

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Runtime configuration shared by every game a registry launches.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// How long the president gets to name a chancellor.
    pub nomination_timeout: Duration,
    /// How long each voter gets to cast a ballot.
    pub vote_timeout: Duration,
    /// How long the president or chancellor gets to pick policies.
    pub policy_timeout: Duration,
    /// Extra attempts granted after an invalid nomination or selection.
    pub retry_limit: u32,
    pub event_buffer_size: usize,
    /// Fixed RNG seed for reproducible deals and shuffles (random if unset).
    pub seed: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            nomination_timeout: Duration::from_secs(60),
            vote_timeout: Duration::from_secs(30),
            policy_timeout: Duration::from_secs(45),
            retry_limit: 3,
            event_buffer_size: 100,
            seed: None,
        }
    }
}

struct GameEntry {
    abort: watch::Sender<bool>,
    events: broadcast::Sender<GameEvent>,
}

struct RegistryInner {
    games: Mutex<HashMap<GameId, GameEntry>>,
    next_id: AtomicU64,
    config: RuntimeConfig,
}

/// Launches games and tracks the live ones.
///
/// Cheap to clone; all clones share the same table of games.
#[derive(Clone)]
pub struct GameRegistry {
    inner: Arc<RegistryInner>,
}

impl GameRegistry {
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                games: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(1),
                config,
            }),
        }
    }

    /// Deals roles to `players` and spawns the session task for a new game.
    ///
    /// The player count is validated before anything is spawned, so a bad
    /// roster fails here and never occupies a registry slot.
    ///
    /// # Errors
    ///
    /// Returns [`game_core::StartError`] (wrapped) if the roster cannot seat
    /// a game.
    pub async fn launch(
        &self,
        players: &[PlayerId],
        input: Arc<dyn InputSource>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<GameHandle> {
        let seed = self.inner.config.seed.unwrap_or_else(rand::random);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let state = GameState::new(players, &mut rng)?;

        let id = GameId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let (abort_tx, abort_rx) = watch::channel(false);
        let (event_tx, _) = broadcast::channel(self.inner.config.event_buffer_size);

        let session = GameSession::new(
            id,
            state,
            rng,
            self.inner.config.clone(),
            input,
            notifier,
            event_tx.clone(),
        );

        self.inner.games.lock().await.insert(
            id,
            GameEntry {
                abort: abort_tx,
                events: event_tx.clone(),
            },
        );

        // The session unregisters itself on the way out, whatever the outcome.
        let inner = Arc::clone(&self.inner);
        let join = tokio::spawn(async move {
            let outcome = session.run(abort_rx).await;
            inner.games.lock().await.remove(&id);
            outcome
        });

        info!(
            target: "runtime::registry",
            game = %id,
            players = players.len(),
            seed,
            "game launched"
        );

        Ok(GameHandle {
            id,
            registry: self.clone(),
            events: event_tx,
            join,
        })
    }

    /// Signals a running game to stop at its next await point.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownGame`] if the game already finished or
    /// never existed.
    pub async fn abort(&self, game: GameId) -> std::result::Result<(), RegistryError> {
        let games = self.inner.games.lock().await;
        let entry = games
            .get(&game)
            .ok_or(RegistryError::UnknownGame { game })?;
        let _ = entry.abort.send(true);
        info!(target: "runtime::registry", game = %game, "abort requested");
        Ok(())
    }

    /// Opens an event feed for a running game.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownGame`] if the game already finished or
    /// never existed.
    pub async fn subscribe(
        &self,
        game: GameId,
    ) -> std::result::Result<broadcast::Receiver<GameEvent>, RegistryError> {
        let games = self.inner.games.lock().await;
        games
            .get(&game)
            .map(|entry| entry.events.subscribe())
            .ok_or(RegistryError::UnknownGame { game })
    }

    /// Ids of every game still running.
    pub async fn active(&self) -> Vec<GameId> {
        self.inner.games.lock().await.keys().copied().collect()
    }
}

impl Default for GameRegistry {
    fn default() -> Self {
        Self::new(RuntimeConfig::default())
    }
}

/// Client-side handle to one launched game.
///
/// Dropping the handle detaches the game; it keeps running under the
/// registry until it finishes or is aborted.
pub struct GameHandle {
    id: GameId,
    registry: GameRegistry,
    events: broadcast::Sender<GameEvent>,
    join: JoinHandle<Result<WinCondition>>,
}

impl GameHandle {
    pub fn id(&self) -> GameId {
        self.id
    }

    /// Opens an event feed for this game. Events published before the call
    /// are not replayed.
    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.events.subscribe()
    }

    /// Signals the game to stop at its next await point.
    pub async fn abort(&self) -> std::result::Result<(), RegistryError> {
        self.registry.abort(self.id).await
    }

    /// Waits for the game to end and returns the verdict.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Aborted`] if the game was aborted,
    /// [`GameError::InsufficientPlayers`] if too many players left, or
    /// [`GameError::Join`] if the session task itself failed.
    pub async fn join(self) -> Result<WinCondition> {
        self.join.await.map_err(GameError::Join)?
    }
}
