//! Core game entities and rules.
//!
//! This module provides the shared table state and the pure pieces the
//! actors coordinate over:
//! - Card, deck and slot types with uniform random draws
//! - The locked board (slot → card mapping plus per-player token marks)
//! - The dealer-written, read-anywhere scoreboard
//! - The combination-validity seam and the classic rule set

pub mod constants;
pub mod entities;
pub mod rules;

pub use entities::{Board, Card, Deck, PlayerId, Score, Scoreboard, Slot, TokenChange};
pub use rules::{ClassicRules, ComboValidator};
