//! Chancellor eligibility under term limits.

use crate::state::{PlayerId, PlayerState};

/// Players the sitting president may nominate for chancellor, in seat order.
///
/// Term limits exclude the members of the last elected government along with
/// the president. When the exclusions would leave nobody to nominate, they are
/// relaxed in a fixed order: the previous president becomes eligible again
/// first, then the previous chancellor. The sitting president is never
/// eligible, so the returned set can only be empty if no other player is
/// alive.
pub fn eligible_nominees(
    players: &[PlayerState],
    president: PlayerId,
    prev_president: Option<PlayerId>,
    prev_chancellor: Option<PlayerId>,
) -> Vec<PlayerId> {
    let living: Vec<PlayerId> = players
        .iter()
        .filter(|player| player.alive)
        .map(|player| player.id)
        .collect();

    let strict: Vec<PlayerId> = living
        .iter()
        .copied()
        .filter(|&id| id != president && Some(id) != prev_president && Some(id) != prev_chancellor)
        .collect();
    if !strict.is_empty() {
        return strict;
    }

    // Term limits would deadlock the round. Readmit the previous president.
    let relaxed: Vec<PlayerId> = living
        .iter()
        .copied()
        .filter(|&id| id != president && Some(id) != prev_chancellor)
        .collect();
    if !relaxed.is_empty() {
        return relaxed;
    }

    living.into_iter().filter(|&id| id != president).collect()
}
