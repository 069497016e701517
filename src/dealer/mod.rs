//! Dealer orchestration: configuration, messages and the dealer task.
//!
//! The dealer runs as a single tokio task consuming the claim queue and
//! owning every mutation of shared state beyond token placement. See
//! [`config::GameConfig`] for the tunables and [`messages`] for the types
//! crossing its channels.

pub mod config;
pub mod messages;

pub(crate) mod actor;

pub use config::{BotTempo, ConfigError, GameConfig};
pub use messages::{Claim, GameStatus, Verdict};
