//! Secret role dealing and the pre-game disclosure each player receives.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::state::{PlayerId, PlayerState, Role};

/// Plain-fascist count for a table of `players`, excluding Hitler.
///
/// 5-6 players seat one fascist, 7-8 two, 9-10 three. Only meaningful for
/// table sizes inside [`crate::state::MIN_PLAYERS`]..=[`crate::state::MAX_PLAYERS`].
pub const fn fascist_count(players: usize) -> usize {
    (players - 3) / 2
}

/// Deals a shuffled role per seat: one Hitler, [`fascist_count`] fascists,
/// liberals in the remaining seats.
pub fn deal(players: usize, rng: &mut impl Rng) -> Vec<Role> {
    let fascists = fascist_count(players);

    let mut roles = Vec::with_capacity(players);
    roles.push(Role::Hitler);
    roles.extend(std::iter::repeat(Role::Fascist).take(fascists));
    roles.extend(std::iter::repeat(Role::Liberal).take(players - fascists - 1));
    roles.shuffle(rng);
    roles
}

/// Everything one player is allowed to know before the first round.
///
/// Pure data; delivering it over a private channel is the caller's job. The
/// fields never appear in any shared record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Briefing {
    pub player: PlayerId,
    pub role: Role,
    /// Fellow plain fascists visible to this player.
    pub known_fascists: Vec<PlayerId>,
    /// Hitler's identity, where the role grants it.
    pub known_hitler: Option<PlayerId>,
}

/// Computes the disclosure for every seat.
///
/// Each fascist learns the other fascists and which player is Hitler. Hitler
/// learns the lone fascist's identity only at tables small enough to seat
/// exactly one. Liberals learn nothing beyond their own role.
pub fn briefings(players: &[PlayerState]) -> Vec<Briefing> {
    let fascists: Vec<PlayerId> = players
        .iter()
        .filter(|player| player.role == Role::Fascist)
        .map(|player| player.id)
        .collect();
    let hitler = players
        .iter()
        .find(|player| player.role == Role::Hitler)
        .map(|player| player.id);

    players
        .iter()
        .map(|player| {
            let (known_fascists, known_hitler) = match player.role {
                Role::Liberal => (Vec::new(), None),
                Role::Fascist => (
                    fascists
                        .iter()
                        .copied()
                        .filter(|&id| id != player.id)
                        .collect(),
                    hitler,
                ),
                Role::Hitler if fascists.len() == 1 => (fascists.clone(), None),
                Role::Hitler => (Vec::new(), None),
            };
            Briefing {
                player: player.id,
                role: player.role,
                known_fascists,
                known_hitler,
            }
        })
        .collect()
}
