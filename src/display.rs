//! The one-way display collaborator.
//!
//! The dealer pushes countdown, freeze, score and winner updates through
//! [`DisplaySink`] and never reads anything back. Renderers implement the
//! trait; headless runs use [`LogDisplay`] or [`NullDisplay`].

use crate::game::{PlayerId, Score};
use log::{debug, info};
use std::time::Duration;

/// Sink for game-state notifications. Implementations must tolerate being
/// called from the dealer task every countdown quantum, so they should be
/// cheap and non-blocking.
pub trait DisplaySink: Send + Sync {
    /// Remaining round time; `warn` is set inside the final stretch.
    fn set_countdown(&self, remaining: Duration, warn: bool);

    /// Remaining cooldown for a player; `Duration::ZERO` means not frozen.
    fn set_freeze(&self, player: PlayerId, remaining: Duration);

    /// A player's score changed.
    fn set_score(&self, player: PlayerId, score: Score);

    /// The game ended; every player tied at the top score is listed.
    fn announce_winners(&self, winners: &[PlayerId]);
}

/// Renders every notification through the `log` macros. The countdown and
/// freeze streams are per-quantum noise, so they log at debug level.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogDisplay;

impl DisplaySink for LogDisplay {
    fn set_countdown(&self, remaining: Duration, warn: bool) {
        if warn {
            debug!("countdown {}ms (warning)", remaining.as_millis());
        } else {
            debug!("countdown {}ms", remaining.as_millis());
        }
    }

    fn set_freeze(&self, player: PlayerId, remaining: Duration) {
        if !remaining.is_zero() {
            debug!("player {player} frozen for {}ms", remaining.as_millis());
        }
    }

    fn set_score(&self, player: PlayerId, score: Score) {
        info!("player {player} score {score}");
    }

    fn announce_winners(&self, winners: &[PlayerId]) {
        info!("winners: {winners:?}");
    }
}

/// Discards every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullDisplay;

impl DisplaySink for NullDisplay {
    fn set_countdown(&self, _remaining: Duration, _warn: bool) {}

    fn set_freeze(&self, _player: PlayerId, _remaining: Duration) {}

    fn set_score(&self, _player: PlayerId, _score: Score) {}

    fn announce_winners(&self, _winners: &[PlayerId]) {}
}
