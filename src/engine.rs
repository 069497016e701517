//! Game assembly and the produced interface.
//!
//! [`GameEngine::start`] wires the board, deck, scoreboard and channels,
//! spawns the dealer, one player actor per seat and one bot feeder per
//! non-human seat, and returns a [`GameHandle`]. The handle is the only
//! surface drivers touch: it routes input, exposes scores and status, and
//! terminates the whole game idempotently.

use crate::{
    bot::BotFeeder,
    dealer::{
        actor::{DealerActor, DealerChannels},
        config::{ConfigError, GameConfig},
        messages::GameStatus,
    },
    display::DisplaySink,
    game::{Board, ComboValidator, Deck, PlayerId, Score, Scoreboard, Slot},
};
use log::warn;
use std::sync::Arc;
use thiserror::Error;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};

/// Errors surfaced at the produced interface.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum GameError {
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),
    #[error("slot {0} out of range")]
    SlotOutOfRange(Slot),
    #[error("game is not running")]
    NotRunning,
}

/// Entry point for starting games.
pub struct GameEngine;

impl GameEngine {
    /// Validate the configuration, wire every actor and spawn the game.
    /// Must be called from within a tokio runtime.
    pub fn start(
        config: GameConfig,
        validator: Arc<dyn ComboValidator>,
        display: Arc<dyn DisplaySink>,
    ) -> Result<GameHandle, ConfigError> {
        config.validate()?;

        let board = Arc::new(Board::new(
            config.board_size,
            config.players,
            config.combo_arity,
        ));
        let deck = Deck::new(config.deck_size);
        let scoreboard = Arc::new(Scoreboard::new(config.players));
        let shutdown = Arc::new(watch::channel(false).0);
        let (status_tx, status_rx) = watch::channel(GameStatus::Running);
        let (claims_tx, claims_rx) = mpsc::channel(config.players.max(1));

        let mut inputs = Vec::with_capacity(config.players);
        let mut releases = Vec::with_capacity(config.players);
        let mut tasks = Vec::new();
        for player in 0..config.players {
            let (input_tx, input_rx) = mpsc::channel(config.input_capacity);
            let (release_tx, release_rx) = mpsc::channel(1);
            let actor = crate::player::PlayerActor::new(
                player,
                Arc::clone(&board),
                input_rx,
                claims_tx.clone(),
                release_rx,
                shutdown.subscribe(),
            );
            tasks.push(tokio::spawn(actor.run()));
            if player >= config.humans {
                let feeder = BotFeeder::new(
                    player,
                    config.board_size,
                    input_tx.clone(),
                    shutdown.subscribe(),
                    config.bot_tempo,
                );
                tasks.push(tokio::spawn(feeder.run()));
            }
            inputs.push(input_tx);
            releases.push(release_tx);
        }
        drop(claims_tx);

        let dealer = DealerActor::new(
            config.clone(),
            Arc::clone(&board),
            deck,
            validator,
            display,
            Arc::clone(&scoreboard),
            DealerChannels {
                claims: claims_rx,
                releases,
                shutdown: Arc::clone(&shutdown),
                status: status_tx,
            },
        );
        let dealer_task = tokio::spawn(dealer.run());

        Ok(GameHandle {
            config,
            board,
            scoreboard,
            inputs,
            shutdown,
            status: status_rx,
            dealer_task,
            tasks,
        })
    }
}

/// Cheap handle over a running game.
pub struct GameHandle {
    config: GameConfig,
    board: Arc<Board>,
    scoreboard: Arc<Scoreboard>,
    inputs: Vec<mpsc::Sender<Slot>>,
    shutdown: Arc<watch::Sender<bool>>,
    status: watch::Receiver<GameStatus>,
    dealer_task: JoinHandle<Vec<PlayerId>>,
    tasks: Vec<JoinHandle<()>>,
}

impl GameHandle {
    /// Route one selection event to a player. Never blocks: a press into a
    /// full inbox (the player is awaiting a verdict) is dropped.
    pub fn key_pressed(&self, player: PlayerId, slot: Slot) -> Result<(), GameError> {
        if player >= self.config.players {
            return Err(GameError::UnknownPlayer(player));
        }
        if slot >= self.config.board_size {
            return Err(GameError::SlotOutOfRange(slot));
        }
        match self.inputs[player].try_send(slot) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("player {player} inbox full, dropping press on slot {slot}");
                Ok(())
            }
            Err(mpsc::error::TrySendError::Closed(_)) => Err(GameError::NotRunning),
        }
    }

    /// Request termination. Idempotent and safe from any task; in-flight
    /// claims are abandoned.
    pub fn terminate(&self) {
        let _ = self.shutdown.send(true);
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status.borrow().is_running()
    }

    pub fn score(&self, player: PlayerId) -> Result<Score, GameError> {
        if player >= self.config.players {
            return Err(GameError::UnknownPlayer(player));
        }
        Ok(self.scoreboard.get(player))
    }

    /// The current slot → card mapping, for renderers.
    #[must_use]
    pub fn board_cards(&self) -> Vec<Option<crate::game::Card>> {
        self.board.cards()
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Wait until the game finishes and return the winners: every player
    /// tied at the maximum score.
    pub async fn finished(&self) -> Vec<PlayerId> {
        let mut status = self.status.clone();
        loop {
            if let GameStatus::Finished { winners } = &*status.borrow() {
                return winners.clone();
            }
            if status.changed().await.is_err() {
                // Dealer gone without publishing; fall back to the board.
                return Vec::new();
            }
        }
    }

    /// Terminate and wait for every task — dealer, players and bot
    /// feeders — to wind down, returning the winners the dealer announced.
    pub async fn shutdown(self) -> Vec<PlayerId> {
        self.terminate();
        let winners = self.dealer_task.await.unwrap_or_default();
        for task in self.tasks {
            let _ = task.await;
        }
        winners
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::NullDisplay;
    use crate::game::ClassicRules;

    fn all_human_config() -> GameConfig {
        GameConfig {
            players: 2,
            humans: 2,
            ..GameConfig::default()
        }
    }

    #[tokio::test]
    async fn start_rejects_invalid_configs() {
        let config = GameConfig {
            players: 0,
            ..GameConfig::default()
        };
        let result = GameEngine::start(config, Arc::new(ClassicRules), Arc::new(NullDisplay));
        assert!(matches!(result, Err(ConfigError::NoPlayers)));
    }

    #[tokio::test]
    async fn key_pressed_validates_player_and_slot() {
        let handle = GameEngine::start(
            all_human_config(),
            Arc::new(ClassicRules),
            Arc::new(NullDisplay),
        )
        .unwrap();
        assert_eq!(handle.key_pressed(5, 0), Err(GameError::UnknownPlayer(5)));
        assert_eq!(handle.key_pressed(0, 99), Err(GameError::SlotOutOfRange(99)));
        assert_eq!(handle.key_pressed(0, 3), Ok(()));
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn score_checks_bounds() {
        let handle = GameEngine::start(
            all_human_config(),
            Arc::new(ClassicRules),
            Arc::new(NullDisplay),
        )
        .unwrap();
        assert_eq!(handle.score(0), Ok(0));
        assert_eq!(handle.score(9), Err(GameError::UnknownPlayer(9)));
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn terminate_is_idempotent() {
        let handle = GameEngine::start(
            all_human_config(),
            Arc::new(ClassicRules),
            Arc::new(NullDisplay),
        )
        .unwrap();
        assert!(handle.is_running());
        handle.terminate();
        handle.terminate();
        let winners = handle.finished().await;
        assert_eq!(winners, vec![0, 1]);
    }
}
