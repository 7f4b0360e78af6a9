//! Self-play demo binary.
//!
//! Launches one or more bot-driven games through the runtime registry and
//! prints the full transcript to stdout. Useful for watching the rules play
//! out end to end and for smoke-testing the whole stack from a shell:
//!
//! ```bash
//! CABAL_PLAYERS=9 CABAL_SEED=42 cargo run -p cabal-client
//! ```
mod bots;
mod config;
mod console;

use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use game_core::PlayerId;
use runtime::{GameRegistry, RuntimeConfig};

use crate::bots::BotInput;
use crate::config::DemoConfig;
use crate::console::ConsoleNotifier;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    dotenvy::dotenv().ok();
    setup_logging();

    let config = DemoConfig::from_env();
    tracing::info!(
        players = config.players,
        games = config.games,
        seed = ?config.seed,
        "starting self-play demo"
    );

    let registry = GameRegistry::new(RuntimeConfig {
        seed: config.seed,
        ..RuntimeConfig::default()
    });

    let roster: Vec<PlayerId> = (1..=config.players).map(PlayerId::new).collect();
    let bot_seed = config.seed.unwrap_or_else(rand::random);

    let mut handles = Vec::with_capacity(config.games as usize);
    for n in 0..config.games {
        let input = Arc::new(BotInput::new(bot_seed.wrapping_add(u64::from(n))));
        let handle = registry
            .launch(&roster, input, Arc::new(ConsoleNotifier))
            .await?;
        handles.push(handle);
    }

    for handle in handles {
        let id = handle.id();
        match handle.join().await {
            Ok(win) => {
                tracing::info!(game = %id, winner = %win.winning_party(), "demo game finished");
            }
            Err(err) => {
                tracing::error!(game = %id, error = %err, "demo game failed");
            }
        }
    }

    Ok(())
}

/// Logs go to stderr so the transcript on stdout stays clean.
fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();
}
