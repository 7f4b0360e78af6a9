//! Demo configuration loaded from the process environment.
use std::env;

/// Knobs for the self-play demo.
#[derive(Clone, Debug)]
pub struct DemoConfig {
    /// Players seated per game.
    pub players: u32,
    /// Games run concurrently.
    pub games: u32,
    /// Fixed seed for reproducible runs (random if unset).
    pub seed: Option<u64>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            players: 7,
            games: 1,
            seed: None,
        }
    }
}

impl DemoConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `CABAL_PLAYERS` - Players per game (default: 7)
    /// - `CABAL_GAMES` - Concurrent games (default: 1)
    /// - `CABAL_SEED` - Fixed seed for deal, shuffles, and bots (default: random)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(players) = read_env::<u32>("CABAL_PLAYERS") {
            config.players = players;
        }
        if let Some(games) = read_env::<u32>("CABAL_GAMES") {
            config.games = games.max(1);
        }
        config.seed = read_env::<u64>("CABAL_SEED");

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
