//! Messages exchanged around the dealer.

use crate::game::PlayerId;

/// A completed selection awaiting adjudication, carried on the claim
/// queue. Enqueued by the claiming player; consumed only by the dealer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Claim {
    pub player: PlayerId,
}

/// Outcome of adjudicating one claim.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Verdict {
    /// The combination was valid: cards removed, point awarded.
    Valid,
    /// The combination was invalid: board untouched, long cooldown.
    Invalid,
    /// The claimant no longer held a full selection; dropped silently.
    Stale,
}

/// Why a countdown loop ended.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum RoundEnd {
    /// The round deadline elapsed.
    TimedOut,
    /// The visible board holds no valid combination but the deck still
    /// might; reshuffle early.
    BoardDry,
    /// No valid combination is left anywhere; the game is over.
    GameOver,
    /// An external terminate request arrived.
    Terminated,
}

/// Broadcast game status, published by the dealer over a watch channel.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GameStatus {
    Running,
    Finished { winners: Vec<PlayerId> },
}

impl GameStatus {
    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }
}
