//! Game-wide constants and default tunables.

use std::time::Duration;

/// Number of cards in the classic deck (3^4 feature combinations).
pub const DEFAULT_DECK_SIZE: usize = 81;

/// Number of card slots on the board.
pub const DEFAULT_BOARD_SIZE: usize = 12;

/// Number of cards in a combination.
pub const COMBO_ARITY: usize = 3;

/// Number of features encoded by a classic card id.
pub const FEATURE_COUNT: usize = 4;

/// Number of values each feature can take.
pub const FEATURE_VALUES: u16 = 3;

/// How long a round runs before the board is reshuffled.
pub const DEFAULT_ROUND_DURATION: Duration = Duration::from_secs(60);

/// Remaining time under which the countdown display carries a warning flag.
pub const DEFAULT_WARN_THRESHOLD: Duration = Duration::from_secs(10);

/// Upper bound on the dealer's wait per countdown iteration.
pub const DEFAULT_QUANTUM: Duration = Duration::from_millis(250);

/// Cooldown applied after a validated combination.
pub const DEFAULT_VALID_COOLDOWN: Duration = Duration::from_secs(1);

/// Cooldown applied after a rejected combination.
pub const DEFAULT_INVALID_COOLDOWN: Duration = Duration::from_secs(3);

/// Capacity of each player's selection-event inbox.
pub const DEFAULT_INPUT_CAPACITY: usize = 8;

/// Default number of seats at the table.
pub const DEFAULT_PLAYER_COUNT: usize = 4;
