//! # Speed Set
//!
//! A timed, multiplayer pattern-matching card game engine built around a
//! dealer/player actor model.
//!
//! A shared board of face-up card slots is dealt from a deck; player actors
//! toggle selection tokens on the board and, on completing a full
//! selection, submit a claim. A single dealer task adjudicates claims in
//! arrival order, removes validated combinations permanently, applies
//! cooldowns, drives the round countdown and reshuffles the board on
//! timeout. Everything runs in one process on tokio tasks.
//!
//! ## Architecture
//!
//! - **Board**: slot → card mapping plus per-player token marks behind one
//!   lock; players may only toggle their own tokens.
//! - **Claim queue**: an mpsc channel from players to the dealer, the sole
//!   consumer; adjudication order is arrival order.
//! - **Dealer**: deal → countdown → (adjudicate | reshuffle) → … →
//!   finished; owns the deck, scores, cooldowns and the round deadline.
//! - **Players**: one task per seat consuming a bounded inbox of selection
//!   events; a completed selection parks the task until the dealer
//!   releases it over a dedicated channel.
//! - **Collaborators**: the validity predicate ([`ComboValidator`]) and
//!   the display sink ([`DisplaySink`]) are injected traits.
//!
//! ## Example
//!
//! ```no_run
//! use speed_set::{ClassicRules, GameConfig, GameEngine, LogDisplay};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     // Four bot seats playing the classic rules.
//!     let config = GameConfig::default();
//!     let handle = GameEngine::start(config, Arc::new(ClassicRules), Arc::new(LogDisplay))
//!         .expect("valid configuration");
//!     let winners = handle.finished().await;
//!     println!("winners: {winners:?}");
//! }
//! ```

/// Core entities, board state and the rule predicate.
pub mod game;
pub use game::{
    Board, Card, ClassicRules, ComboValidator, Deck, PlayerId, Score, Scoreboard, Slot,
    TokenChange, constants,
};

/// Dealer orchestration: configuration, messages, the dealer task.
pub mod dealer;
pub use dealer::{BotTempo, ConfigError, GameConfig, GameStatus, Verdict};

/// Player actors.
pub(crate) mod player;

/// Synthetic move sources for bot seats.
pub(crate) mod bot;

/// The one-way display collaborator.
pub mod display;
pub use display::{DisplaySink, LogDisplay, NullDisplay};

/// Game assembly and the produced interface.
pub mod engine;
pub use engine::{GameEngine, GameError, GameHandle};
