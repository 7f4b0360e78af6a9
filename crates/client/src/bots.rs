//! Scripted players for self-play games.
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use game_core::{Party, PlayerId};
use runtime::{InputError, InputSource};

/// Plays every seat with random legal decisions.
///
/// Votes lean in favor so governments form often enough for every game to
/// reach a verdict.
pub struct BotInput {
    rng: Mutex<ChaCha8Rng>,
}

impl BotInput {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }
}

#[async_trait]
impl InputSource for BotInput {
    async fn nomination(
        &self,
        _president: PlayerId,
        eligible: &[PlayerId],
        _allowed: Duration,
    ) -> Result<PlayerId, InputError> {
        let mut rng = self.rng.lock().unwrap();
        Ok(eligible[rng.gen_range(0..eligible.len())])
    }

    async fn vote(
        &self,
        _voter: PlayerId,
        _nominee: PlayerId,
        _allowed: Duration,
    ) -> Result<bool, InputError> {
        let mut rng = self.rng.lock().unwrap();
        Ok(rng.gen_bool(0.75))
    }

    async fn policy_choice(
        &self,
        _chooser: PlayerId,
        hand: &[Party],
        choose: usize,
        _allowed: Duration,
    ) -> Result<Vec<usize>, InputError> {
        let mut rng = self.rng.lock().unwrap();
        Ok(rand::seq::index::sample(&mut *rng, hand.len(), choose).into_vec())
    }
}
