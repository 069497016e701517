use rand::Rng;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeSet,
    fmt,
    sync::{
        Mutex,
        atomic::{AtomicU32, Ordering},
    },
};

/// A card is an opaque identifier drawn from a fixed universe of
/// `deck_size` ids. The classic rule set reads the id as four base-3
/// feature digits.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Card(pub u16);

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02}", self.0)
    }
}

/// Index of a board position holding zero or one card.
pub type Slot = usize;

/// Identifier of a seat at the table, starting from 0.
pub type PlayerId = usize;

/// Per-player point counter.
pub type Score = u32;

/// The cards not currently on the board and not yet removed from play.
/// Owned exclusively by the dealer; draws are uniformly random over the
/// remaining cards.
#[derive(Debug)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    #[must_use]
    pub fn new(deck_size: usize) -> Self {
        Self {
            cards: (0..deck_size).map(|id| Card(id as u16)).collect(),
        }
    }

    /// Draw one uniformly-random remaining card, or `None` when exhausted.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Card> {
        if self.cards.is_empty() {
            return None;
        }
        let idx = rng.random_range(0..self.cards.len());
        Some(self.cards.swap_remove(idx))
    }

    /// Return a card to the deck during a reshuffle.
    pub fn put_back(&mut self, card: Card) {
        debug_assert!(
            !self.cards.contains(&card),
            "card {card} returned to the deck twice"
        );
        self.cards.push(card);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

/// Outcome of a player's selection press on a slot.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TokenChange {
    /// A token was placed; `tokens` is the player's new token count.
    Placed { tokens: usize },
    /// A token was removed; `tokens` is the player's new token count.
    Removed { tokens: usize },
    /// The press had no effect (empty slot, or already at the token cap).
    Ignored,
}

/// The shared table: a fixed array of card slots plus per-player token
/// marks. All access goes through the internal lock; the lock is never
/// held across an await point.
///
/// Mutation rights are split the way the game splits them: players may
/// only toggle their own tokens, the dealer does everything else.
#[derive(Debug)]
pub struct Board {
    arity: usize,
    inner: Mutex<BoardInner>,
}

#[derive(Debug)]
struct BoardInner {
    slot_to_card: Vec<Option<Card>>,
    /// One token set per player. A slot appears in at most one entry per
    /// player and only while that slot holds a card.
    player_tokens: Vec<BTreeSet<Slot>>,
}

impl Board {
    #[must_use]
    pub fn new(board_size: usize, player_count: usize, arity: usize) -> Self {
        Self {
            arity,
            inner: Mutex::new(BoardInner {
                slot_to_card: vec![None; board_size],
                player_tokens: vec![BTreeSet::new(); player_count],
            }),
        }
    }

    #[must_use]
    pub fn board_size(&self) -> usize {
        self.lock().slot_to_card.len()
    }

    #[must_use]
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Place a card on an empty slot. Placing onto an occupied slot means
    /// the dealer's bookkeeping has diverged, so it fails fast.
    pub fn place_card(&self, card: Card, slot: Slot) {
        let mut inner = self.lock();
        assert!(
            inner.slot_to_card[slot].is_none(),
            "card {card} placed on occupied slot {slot}"
        );
        debug_assert!(
            !inner.slot_to_card.contains(&Some(card)),
            "card {card} already on the board"
        );
        inner.slot_to_card[slot] = Some(card);
    }

    /// Remove the card at `slot`, stripping every player's token bound to
    /// it. Returns the card, or `None` for an already-empty slot.
    pub fn remove_card(&self, slot: Slot) -> Option<Card> {
        let mut inner = self.lock();
        let card = inner.slot_to_card[slot].take()?;
        for tokens in &mut inner.player_tokens {
            tokens.remove(&slot);
        }
        Some(card)
    }

    /// Apply one selection press for `player`: remove their token if the
    /// slot carries one, otherwise place one if the slot holds a card and
    /// the player is below the token cap.
    pub fn toggle_token(&self, player: PlayerId, slot: Slot) -> TokenChange {
        let mut inner = self.lock();
        assert!(slot < inner.slot_to_card.len(), "slot {slot} out of range");
        if inner.player_tokens[player].remove(&slot) {
            return TokenChange::Removed {
                tokens: inner.player_tokens[player].len(),
            };
        }
        if inner.player_tokens[player].len() >= self.arity || inner.slot_to_card[slot].is_none() {
            return TokenChange::Ignored;
        }
        inner.player_tokens[player].insert(slot);
        TokenChange::Placed {
            tokens: inner.player_tokens[player].len(),
        }
    }

    #[must_use]
    pub fn token_count(&self, player: PlayerId) -> usize {
        self.lock().player_tokens[player].len()
    }

    /// Snapshot of a player's claim: their token slots and the cards those
    /// slots hold, taken under one lock acquisition. A token on an empty
    /// slot is a bookkeeping contract violation.
    #[must_use]
    pub fn claim_of(&self, player: PlayerId) -> (Vec<Slot>, Vec<Card>) {
        let inner = self.lock();
        let slots: Vec<Slot> = inner.player_tokens[player].iter().copied().collect();
        let cards = slots
            .iter()
            .map(|&slot| {
                inner.slot_to_card[slot]
                    .unwrap_or_else(|| panic!("token of player {player} on empty slot {slot}"))
            })
            .collect();
        (slots, cards)
    }

    #[must_use]
    pub fn card_at(&self, slot: Slot) -> Option<Card> {
        self.lock().slot_to_card[slot]
    }

    /// The full slot → card mapping, for renderers.
    #[must_use]
    pub fn cards(&self) -> Vec<Option<Card>> {
        self.lock().slot_to_card.clone()
    }

    /// Every card currently face-up, in slot order.
    #[must_use]
    pub fn visible_cards(&self) -> Vec<Card> {
        self.lock().slot_to_card.iter().flatten().copied().collect()
    }

    #[must_use]
    pub fn count_cards(&self) -> usize {
        self.lock().slot_to_card.iter().flatten().count()
    }

    #[must_use]
    pub fn empty_slots(&self) -> Vec<Slot> {
        self.lock()
            .slot_to_card
            .iter()
            .enumerate()
            .filter(|(_, card)| card.is_none())
            .map(|(slot, _)| slot)
            .collect()
    }

    pub fn clear_all_tokens(&self) {
        let mut inner = self.lock();
        for tokens in &mut inner.player_tokens {
            tokens.clear();
        }
    }

    /// Empty the whole board for a reshuffle, clearing every token and
    /// returning the collected cards.
    pub fn take_all_cards(&self) -> Vec<Card> {
        let mut inner = self.lock();
        for tokens in &mut inner.player_tokens {
            tokens.clear();
        }
        inner
            .slot_to_card
            .iter_mut()
            .filter_map(|slot| slot.take())
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BoardInner> {
        // A poisoned board means a panic mid-mutation; propagating it
        // would only mask the original failure.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Per-player score counters. Written only by the dealer; read anywhere.
#[derive(Debug)]
pub struct Scoreboard {
    scores: Vec<AtomicU32>,
}

impl Scoreboard {
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        Self {
            scores: (0..player_count).map(|_| AtomicU32::new(0)).collect(),
        }
    }

    #[must_use]
    pub fn get(&self, player: PlayerId) -> Score {
        self.scores[player].load(Ordering::Relaxed)
    }

    /// Award one point and return the new score.
    pub fn increment(&self, player: PlayerId) -> Score {
        self.scores[player].fetch_add(1, Ordering::Relaxed) + 1
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.scores.len()
    }
}
