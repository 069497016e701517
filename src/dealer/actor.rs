//! Dealer orchestrator implementation.
//!
//! The dealer is the only task allowed to mutate shared state beyond token
//! placement: it deals and removes cards, adjudicates claims in arrival
//! order, owns every cooldown timestamp and the round deadline, and wakes
//! blocked players over their dedicated release channels.

use super::{
    config::GameConfig,
    messages::{Claim, GameStatus, RoundEnd, Verdict},
};
use crate::{
    display::DisplaySink,
    game::{Board, ComboValidator, Deck, PlayerId, Scoreboard},
};
use log::{debug, info};
use std::{cmp, sync::Arc};
use tokio::{
    sync::{mpsc, watch},
    time::{self, Instant},
};

/// Channel ends handed to the dealer at wiring time.
pub(crate) struct DealerChannels {
    /// Claim queue; the dealer is the sole consumer.
    pub claims: mpsc::Receiver<Claim>,
    /// One single-slot release channel per player.
    pub releases: Vec<mpsc::Sender<()>>,
    /// Process-wide terminate flag. The dealer both observes it and raises
    /// it on exit so every other task winds down with it.
    pub shutdown: Arc<watch::Sender<bool>>,
    /// Status broadcast for observers.
    pub status: watch::Sender<GameStatus>,
}

/// Per-player adjudication bookkeeping. The cooldown timestamp doubles as
/// the freeze display source; `awaiting_release` is set the moment a claim
/// is consumed and cleared when the release message goes out.
struct PlayerBook {
    cooldown_until: Instant,
    awaiting_release: bool,
}

/// The dealer task. Owns the deck outright and the board by exclusive
/// convention (players only touch their own tokens).
pub(crate) struct DealerActor {
    config: GameConfig,
    board: Arc<Board>,
    deck: Deck,
    validator: Arc<dyn ComboValidator>,
    display: Arc<dyn DisplaySink>,
    scoreboard: Arc<Scoreboard>,
    claims: mpsc::Receiver<Claim>,
    releases: Vec<mpsc::Sender<()>>,
    shutdown_tx: Arc<watch::Sender<bool>>,
    shutdown: watch::Receiver<bool>,
    status: watch::Sender<GameStatus>,
    books: Vec<PlayerBook>,
    deadline: Instant,
    /// Cards permanently out of play via validated combinations.
    removed: usize,
}

impl DealerActor {
    pub(crate) fn new(
        config: GameConfig,
        board: Arc<Board>,
        deck: Deck,
        validator: Arc<dyn ComboValidator>,
        display: Arc<dyn DisplaySink>,
        scoreboard: Arc<Scoreboard>,
        channels: DealerChannels,
    ) -> Self {
        let now = Instant::now();
        let books = (0..config.players)
            .map(|_| PlayerBook {
                cooldown_until: now,
                awaiting_release: false,
            })
            .collect();
        let deadline = now + config.round_duration;
        Self {
            board,
            deck,
            validator,
            display,
            scoreboard,
            claims: channels.claims,
            releases: channels.releases,
            shutdown: channels.shutdown.subscribe(),
            shutdown_tx: channels.shutdown,
            status: channels.status,
            books,
            deadline,
            removed: 0,
            config,
        }
    }

    /// Main loop: deal, run the countdown, reshuffle, repeat until no
    /// valid combination is left anywhere or a terminate request arrives.
    /// Returns the winners.
    pub(crate) async fn run(mut self) -> Vec<PlayerId> {
        info!(
            "dealer starting: {} players, {} slots, deck of {}",
            self.config.players, self.config.board_size, self.config.deck_size
        );
        while !self.is_terminated() && self.any_combination_left() {
            self.deal();
            self.update_countdown(true);
            match self.countdown_loop().await {
                RoundEnd::Terminated | RoundEnd::GameOver => break,
                RoundEnd::TimedOut | RoundEnd::BoardDry => self.reshuffle(),
            }
        }
        let winners = self.announce_winners();
        let _ = self.status.send(GameStatus::Finished {
            winners: winners.clone(),
        });
        // Bring every player and bot feeder down with the dealer.
        let _ = self.shutdown_tx.send(true);
        info!("dealer terminated");
        winners
    }

    /// One countdown round: bounded interruptible waits, at most one claim
    /// adjudicated per iteration, freeze publishing, early exit when the
    /// board or the whole game runs dry.
    async fn countdown_loop(&mut self) -> RoundEnd {
        loop {
            if self.is_terminated() {
                return RoundEnd::Terminated;
            }
            let now = Instant::now();
            if now >= self.deadline {
                return RoundEnd::TimedOut;
            }
            let wake = cmp::min(self.deadline, now + self.config.quantum);
            let mut claim = None;
            {
                let claims = &mut self.claims;
                let shutdown = &mut self.shutdown;
                tokio::select! {
                    _ = shutdown.changed() => return RoundEnd::Terminated,
                    received = claims.recv() => match received {
                        Some(c) => claim = Some(c),
                        // Every claim sender is gone: no player can act.
                        None => return RoundEnd::Terminated,
                    },
                    _ = time::sleep_until(wake) => {}
                }
            }
            self.update_countdown(false);
            if let Some(claim) = claim {
                self.adjudicate(claim);
                self.deal();
            }
            self.publish_freezes();
            if !self.any_combination_left() {
                return RoundEnd::GameOver;
            }
            if self.board_is_dry() {
                return RoundEnd::BoardDry;
            }
        }
    }

    /// Judge one claim. Claims whose token count no longer matches the
    /// combination arity are dropped without side effects; the claimant is
    /// still parked until the next freeze pass releases it.
    fn adjudicate(&mut self, claim: Claim) -> Verdict {
        let player = claim.player;
        self.books[player].awaiting_release = true;
        let (slots, cards) = self.board.claim_of(player);
        if slots.len() != self.config.combo_arity {
            debug!("player {player} claim stale ({} tokens)", slots.len());
            return Verdict::Stale;
        }
        if self.validator.is_valid_combination(&cards) {
            for &slot in &slots {
                self.board.remove_card(slot);
            }
            self.removed += slots.len();
            self.assert_conservation();
            let score = self.scoreboard.increment(player);
            self.display.set_score(player, score);
            self.books[player].cooldown_until = Instant::now() + self.config.valid_cooldown;
            self.update_countdown(true);
            info!("player {player} scored, now at {score}");
            Verdict::Valid
        } else {
            self.books[player].cooldown_until = Instant::now() + self.config.invalid_cooldown;
            debug!("player {player} claimed an invalid combination");
            Verdict::Invalid
        }
    }

    /// Fill every empty slot with a uniformly-random card until the board
    /// is full or the deck runs out. Exhaustion just leaves slots empty.
    fn deal(&mut self) {
        let mut rng = rand::rng();
        let mut placed = 0;
        for slot in self.board.empty_slots() {
            let Some(card) = self.deck.draw(&mut rng) else {
                break;
            };
            self.board.place_card(card, slot);
            placed += 1;
        }
        if placed > 0 {
            debug!("dealt {placed} cards, {} left in the deck", self.deck.len());
        }
        self.assert_conservation();
    }

    /// Publish each player's remaining cooldown, and release every parked
    /// player whose cooldown has expired over its own channel.
    fn publish_freezes(&mut self) {
        let now = Instant::now();
        for player in 0..self.books.len() {
            let book = &mut self.books[player];
            let remaining = book.cooldown_until.saturating_duration_since(now);
            self.display.set_freeze(player, remaining);
            if remaining.is_zero() && book.awaiting_release {
                book.awaiting_release = false;
                if self.releases[player].try_send(()).is_err() {
                    debug!("player {player} release channel unavailable");
                }
            }
        }
    }

    /// Return every board card to the deck and wipe all tokens.
    fn reshuffle(&mut self) {
        for card in self.board.take_all_cards() {
            self.deck.put_back(card);
        }
        self.assert_conservation();
        info!("board reshuffled, {} cards in the deck", self.deck.len());
    }

    fn update_countdown(&mut self, reset: bool) {
        if reset {
            self.deadline = Instant::now() + self.config.round_duration;
        }
        let remaining = self.deadline.saturating_duration_since(Instant::now());
        self.display
            .set_countdown(remaining, remaining <= self.config.warn_threshold);
    }

    fn announce_winners(&self) -> Vec<PlayerId> {
        let top = (0..self.config.players)
            .map(|player| self.scoreboard.get(player))
            .max()
            .unwrap_or(0);
        let winners: Vec<PlayerId> = (0..self.config.players)
            .filter(|&player| self.scoreboard.get(player) == top)
            .collect();
        self.display.announce_winners(&winners);
        info!("game over, winners {winners:?} with {top} points");
        winners
    }

    fn is_terminated(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Valid combination anywhere in deck ∪ board?
    fn any_combination_left(&self) -> bool {
        let mut cards = self.board.visible_cards();
        cards.extend_from_slice(self.deck.cards());
        self.validator.exists_valid_combination(&cards, 1)
    }

    /// Valid combination among the face-up cards?
    fn board_is_dry(&self) -> bool {
        !self
            .validator
            .exists_valid_combination(&self.board.visible_cards(), 1)
    }

    /// Card conservation: deck + board + permanently removed must always
    /// cover the whole universe exactly once.
    fn assert_conservation(&self) {
        debug_assert_eq!(
            self.deck.len() + self.board.count_cards() + self.removed,
            self.config.deck_size,
            "card conservation violated"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::NullDisplay;
    use crate::game::Card;
    use std::time::Duration;

    /// Validator with scripted answers, independent of the cards shown.
    struct Scripted {
        valid: bool,
        exists: bool,
    }

    impl ComboValidator for Scripted {
        fn is_valid_combination(&self, _cards: &[Card]) -> bool {
            self.valid
        }

        fn exists_valid_combination(&self, _cards: &[Card], _at_least: usize) -> bool {
            self.exists
        }
    }

    struct Fixture {
        dealer: DealerActor,
        releases: Vec<mpsc::Receiver<()>>,
    }

    fn fixture(valid: bool, exists: bool) -> Fixture {
        let config = GameConfig {
            players: 2,
            ..GameConfig::default()
        };
        let board = Arc::new(Board::new(
            config.board_size,
            config.players,
            config.combo_arity,
        ));
        let deck = Deck::new(config.deck_size);
        let scoreboard = Arc::new(Scoreboard::new(config.players));
        let (_claims_tx, claims_rx) = mpsc::channel(config.players);
        let (release_txs, release_rxs): (Vec<_>, Vec<_>) =
            (0..config.players).map(|_| mpsc::channel(1)).unzip();
        let shutdown = Arc::new(watch::channel(false).0);
        let (status_tx, _status_rx) = watch::channel(GameStatus::Running);
        let dealer = DealerActor::new(
            config,
            board,
            deck,
            Arc::new(Scripted { valid, exists }),
            Arc::new(NullDisplay),
            scoreboard,
            DealerChannels {
                claims: claims_rx,
                releases: release_txs,
                shutdown,
                status: status_tx,
            },
        );
        Fixture {
            dealer,
            releases: release_rxs,
        }
    }

    fn select_three(dealer: &DealerActor, player: PlayerId) {
        for slot in [1, 4, 7] {
            dealer.board.toggle_token(player, slot);
        }
    }

    #[tokio::test]
    async fn deal_fills_the_board() {
        let mut f = fixture(true, true);
        f.dealer.deal();
        assert_eq!(f.dealer.board.count_cards(), 12);
        assert_eq!(f.dealer.deck.len(), 81 - 12);
    }

    #[tokio::test]
    async fn valid_claim_scores_and_removes_cards() {
        let mut f = fixture(true, true);
        f.dealer.deal();
        select_three(&f.dealer, 0);
        let verdict = f.dealer.adjudicate(Claim { player: 0 });
        assert_eq!(verdict, Verdict::Valid);
        assert_eq!(f.dealer.scoreboard.get(0), 1);
        assert_eq!(f.dealer.board.count_cards(), 9);
        assert_eq!(f.dealer.removed, 3);
        assert!(f.dealer.books[0].awaiting_release);
        // Refill restores the board without touching removed cards.
        f.dealer.deal();
        assert_eq!(f.dealer.board.count_cards(), 12);
        assert_eq!(f.dealer.deck.len(), 81 - 12 - 3);
    }

    #[tokio::test]
    async fn invalid_claim_leaves_board_and_sets_long_cooldown() {
        let mut f = fixture(false, true);
        f.dealer.deal();
        let before = f.dealer.board.cards();
        select_three(&f.dealer, 1);
        let verdict = f.dealer.adjudicate(Claim { player: 1 });
        assert_eq!(verdict, Verdict::Invalid);
        assert_eq!(f.dealer.scoreboard.get(1), 0);
        assert_eq!(f.dealer.board.cards(), before);
        let cooldown = f.dealer.books[1]
            .cooldown_until
            .saturating_duration_since(Instant::now());
        assert!(cooldown > Duration::from_millis(2900));
        assert!(cooldown <= Duration::from_millis(3000));
    }

    #[tokio::test]
    async fn short_selection_is_dropped_silently() {
        let mut f = fixture(true, true);
        f.dealer.deal();
        f.dealer.board.toggle_token(0, 2);
        let verdict = f.dealer.adjudicate(Claim { player: 0 });
        assert_eq!(verdict, Verdict::Stale);
        assert_eq!(f.dealer.scoreboard.get(0), 0);
        assert_eq!(f.dealer.board.count_cards(), 12);
        // Stale claimants are still parked, then freed on the next pass.
        assert!(f.dealer.books[0].awaiting_release);
        f.dealer.publish_freezes();
        assert!(!f.dealer.books[0].awaiting_release);
        assert!(f.releases[0].try_recv().is_ok());
    }

    #[tokio::test]
    async fn release_waits_for_the_cooldown() {
        let mut f = fixture(true, true);
        f.dealer.books[0].awaiting_release = true;
        f.dealer.books[0].cooldown_until = Instant::now() + Duration::from_secs(1);
        f.dealer.publish_freezes();
        assert!(f.releases[0].try_recv().is_err());
        f.dealer.books[0].cooldown_until = Instant::now();
        f.dealer.publish_freezes();
        assert!(f.releases[0].try_recv().is_ok());
        assert!(!f.dealer.books[0].awaiting_release);
    }

    #[tokio::test]
    async fn valid_claim_resets_the_round_deadline() {
        let mut f = fixture(true, true);
        f.dealer.deal();
        f.dealer.deadline = Instant::now() + Duration::from_secs(5);
        select_three(&f.dealer, 0);
        f.dealer.adjudicate(Claim { player: 0 });
        let remaining = f
            .dealer
            .deadline
            .saturating_duration_since(Instant::now());
        assert!(remaining > Duration::from_secs(59));
    }

    #[tokio::test]
    async fn reshuffle_returns_everything_to_the_deck() {
        let mut f = fixture(true, true);
        f.dealer.deal();
        select_three(&f.dealer, 0);
        f.dealer.reshuffle();
        assert_eq!(f.dealer.deck.len(), 81);
        assert_eq!(f.dealer.board.count_cards(), 0);
        assert_eq!(f.dealer.board.token_count(0), 0);
    }

    #[tokio::test]
    async fn winners_are_everyone_tied_at_the_top() {
        let f = fixture(true, true);
        f.dealer.scoreboard.increment(0);
        f.dealer.scoreboard.increment(1);
        assert_eq!(f.dealer.announce_winners(), vec![0, 1]);
        f.dealer.scoreboard.increment(1);
        assert_eq!(f.dealer.announce_winners(), vec![1]);
    }
}
