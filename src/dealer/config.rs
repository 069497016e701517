//! Game configuration models.

use crate::game::constants::{
    COMBO_ARITY, DEFAULT_BOARD_SIZE, DEFAULT_DECK_SIZE, DEFAULT_INPUT_CAPACITY,
    DEFAULT_INVALID_COOLDOWN, DEFAULT_PLAYER_COUNT, DEFAULT_QUANTUM, DEFAULT_ROUND_DURATION,
    DEFAULT_VALID_COOLDOWN, DEFAULT_WARN_THRESHOLD,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors produced by [`GameConfig::validate`].
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    #[error("need at least one player")]
    NoPlayers,
    #[error("{humans} human players but only {players} seats")]
    TooManyHumans { humans: usize, players: usize },
    #[error("board of {board_size} slots cannot hold a {arity}-card combination")]
    BoardTooSmall { board_size: usize, arity: usize },
    #[error("combination arity must be positive")]
    ZeroArity,
    #[error("deck of {deck_size} cards cannot fill a board of {board_size} slots")]
    DeckTooSmall { deck_size: usize, board_size: usize },
    #[error("countdown quantum must be positive")]
    ZeroQuantum,
    #[error("round duration must exceed the warning threshold")]
    RoundTooShort,
    #[error("player inboxes need capacity for at least one press")]
    ZeroInputCapacity,
}

/// Pacing presets for bot players, in the spirit of table speeds.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BotTempo {
    Casual,
    #[default]
    Quick,
    Frenzied,
}

impl BotTempo {
    /// Base think delay and maximum random jitter between presses.
    #[must_use]
    pub fn think_delay(self) -> (Duration, Duration) {
        match self {
            Self::Casual => (Duration::from_millis(800), Duration::from_millis(700)),
            Self::Quick => (Duration::from_millis(300), Duration::from_millis(300)),
            Self::Frenzied => (Duration::from_millis(60), Duration::from_millis(90)),
        }
    }
}

impl std::fmt::Display for BotTempo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Casual => write!(f, "casual"),
            Self::Quick => write!(f, "quick"),
            Self::Frenzied => write!(f, "frenzied"),
        }
    }
}

/// Full configuration of one game.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GameConfig {
    /// Number of seats at the table.
    pub players: usize,

    /// The first `humans` seats take selection events from the outside;
    /// every remaining seat is driven by a synthetic bot feeder.
    pub humans: usize,

    /// Number of card slots on the board.
    pub board_size: usize,

    /// Size of the card universe.
    pub deck_size: usize,

    /// Cards per combination (the token cap per player).
    pub combo_arity: usize,

    /// How long a round runs before the board is reshuffled. The deadline
    /// resets on reshuffle and on every validated combination.
    pub round_duration: Duration,

    /// Remaining time under which the countdown carries a warning flag.
    pub warn_threshold: Duration,

    /// Upper bound on the dealer's wait per countdown iteration; claim
    /// arrival and termination cut it short.
    pub quantum: Duration,

    /// Cooldown after a validated combination.
    pub valid_cooldown: Duration,

    /// Cooldown after a rejected combination.
    pub invalid_cooldown: Duration,

    /// Capacity of each player's selection-event inbox; presses beyond it
    /// are dropped, not queued.
    pub input_capacity: usize,

    /// Pacing preset for bot seats.
    pub bot_tempo: BotTempo,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            players: DEFAULT_PLAYER_COUNT,
            humans: 0,
            board_size: DEFAULT_BOARD_SIZE,
            deck_size: DEFAULT_DECK_SIZE,
            combo_arity: COMBO_ARITY,
            round_duration: DEFAULT_ROUND_DURATION,
            warn_threshold: DEFAULT_WARN_THRESHOLD,
            quantum: DEFAULT_QUANTUM,
            valid_cooldown: DEFAULT_VALID_COOLDOWN,
            invalid_cooldown: DEFAULT_INVALID_COOLDOWN,
            input_capacity: DEFAULT_INPUT_CAPACITY,
            bot_tempo: BotTempo::default(),
        }
    }
}

impl GameConfig {
    /// Validate the configuration before wiring any actors to it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.players == 0 {
            return Err(ConfigError::NoPlayers);
        }
        if self.humans > self.players {
            return Err(ConfigError::TooManyHumans {
                humans: self.humans,
                players: self.players,
            });
        }
        if self.combo_arity == 0 {
            return Err(ConfigError::ZeroArity);
        }
        if self.board_size < self.combo_arity {
            return Err(ConfigError::BoardTooSmall {
                board_size: self.board_size,
                arity: self.combo_arity,
            });
        }
        if self.deck_size < self.board_size {
            return Err(ConfigError::DeckTooSmall {
                deck_size: self.deck_size,
                board_size: self.board_size,
            });
        }
        if self.quantum.is_zero() {
            return Err(ConfigError::ZeroQuantum);
        }
        if self.round_duration <= self.warn_threshold {
            return Err(ConfigError::RoundTooShort);
        }
        if self.input_capacity == 0 {
            return Err(ConfigError::ZeroInputCapacity);
        }
        Ok(())
    }

    /// Number of bot seats.
    #[must_use]
    pub fn bots(&self) -> usize {
        self.players - self.humans
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_zero_players() {
        let config = GameConfig {
            players: 0,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoPlayers));
    }

    #[test]
    fn rejects_more_humans_than_seats() {
        let config = GameConfig {
            players: 2,
            humans: 3,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooManyHumans {
                humans: 3,
                players: 2
            })
        );
    }

    #[test]
    fn rejects_board_smaller_than_arity() {
        let config = GameConfig {
            board_size: 2,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BoardTooSmall { .. })
        ));
    }

    #[test]
    fn rejects_round_shorter_than_warning() {
        let config = GameConfig {
            round_duration: Duration::from_secs(5),
            warn_threshold: Duration::from_secs(10),
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::RoundTooShort));
    }

    #[test]
    fn tempo_delays_scale_down() {
        let (casual, _) = BotTempo::Casual.think_delay();
        let (quick, _) = BotTempo::Quick.think_delay();
        let (frenzied, _) = BotTempo::Frenzied.think_delay();
        assert!(casual > quick && quick > frenzied);
    }
}
