use std::fmt;

/// Unique identifier for a seated player.
///
/// Assigned by the caller at game start and never reused within a game. The
/// order of identifiers passed at start fixes the seat order, which in turn
/// fixes the presidency rotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerId(pub u32);

impl PlayerId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Party alignment.
///
/// Doubles as the type of a policy card: a card is fully characterized by the
/// party it advances, so enacting a card and checking a role's allegiance use
/// the same enum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Party {
    Liberal,
    Fascist,
}

impl Party {
    pub const fn as_str(self) -> &'static str {
        match self {
            Party::Liberal => "liberal",
            Party::Fascist => "fascist",
        }
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Secret role dealt to a player at game start.
///
/// Exactly one player holds [`Role::Hitler`]; the plain-fascist count scales
/// with the table size (see [`crate::roles::fascist_count`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    Liberal,
    Fascist,
    Hitler,
}

impl Role {
    /// Party this role wins with. Hitler counts as a fascist.
    pub const fn party(self) -> Party {
        match self {
            Role::Liberal => Party::Liberal,
            Role::Fascist | Role::Hitler => Party::Fascist,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Liberal => "Liberal",
            Role::Fascist => "Fascist",
            Role::Hitler => "Hitler",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-seat player record.
///
/// Seats are never compacted: a player who leaves the game permanently is
/// marked not alive and skipped by the rotation, so stored seat indices stay
/// valid for the whole game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerState {
    pub id: PlayerId,
    pub role: Role,
    pub alive: bool,
}

impl PlayerState {
    pub const fn new(id: PlayerId, role: Role) -> Self {
        Self {
            id,
            role,
            alive: true,
        }
    }
}
