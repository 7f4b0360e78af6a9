//! Enacted-policy bookkeeping and track win conditions.

use std::fmt;

use super::player::Party;

/// Liberal policies needed for a liberal track win.
pub const LIBERAL_TRACK: u8 = 5;

/// Fascist policies needed for a fascist track win.
pub const FASCIST_TRACK: u8 = 6;

/// Fascist policies after which confirming Hitler as chancellor ends the game.
pub const HITLER_CHANCELLOR_THRESHOLD: u8 = 3;

/// Cumulative counters of enacted policies.
///
/// Counters only ever increase and are mutated exclusively through the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Board {
    pub liberal: u8,
    pub fascist: u8,
}

impl Board {
    /// Records an enacted policy and returns the updated `(liberal, fascist)`
    /// totals.
    pub fn enact(&mut self, party: Party) -> (u8, u8) {
        match party {
            Party::Liberal => self.liberal += 1,
            Party::Fascist => self.fascist += 1,
        }
        (self.liberal, self.fascist)
    }

    /// Checks whether either track is complete.
    pub fn check_win(&self) -> Option<WinCondition> {
        if self.liberal >= LIBERAL_TRACK {
            Some(WinCondition::LiberalTrack)
        } else if self.fascist >= FASCIST_TRACK {
            Some(WinCondition::FascistTrack)
        } else {
            None
        }
    }

    /// True once enough fascist policies have passed that electing Hitler
    /// chancellor wins the game outright.
    pub fn hitler_chancellor_wins(&self) -> bool {
        self.fascist >= HITLER_CHANCELLOR_THRESHOLD
    }
}

/// How a finished game was decided.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WinCondition {
    /// Five liberal policies enacted.
    LiberalTrack,
    /// Six fascist policies enacted.
    FascistTrack,
    /// Hitler confirmed as chancellor late in the game.
    HitlerChancellor,
}

impl WinCondition {
    pub const fn winning_party(self) -> Party {
        match self {
            WinCondition::LiberalTrack => Party::Liberal,
            WinCondition::FascistTrack | WinCondition::HitlerChancellor => Party::Fascist,
        }
    }
}

impl fmt::Display for WinCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WinCondition::LiberalTrack => "liberal track complete",
            WinCondition::FascistTrack => "fascist track complete",
            WinCondition::HitlerChancellor => "Hitler elected chancellor",
        };
        f.write_str(label)
    }
}
