//! Synthetic selection-event generator for bot seats.

use crate::{dealer::config::BotTempo, game::Slot};
use log::{debug, info};
use rand::Rng;
use tokio::{
    sync::{mpsc, watch},
    time,
};

/// Feeds uniformly random slot presses into one player's inbox, paced by
/// the tempo's think delay plus jitter. The feeder knows nothing about the
/// game: it is just a move source, and the player actor treats its presses
/// exactly like keyboard input.
pub(crate) struct BotFeeder {
    id: usize,
    board_size: usize,
    input: mpsc::Sender<Slot>,
    shutdown: watch::Receiver<bool>,
    tempo: BotTempo,
}

impl BotFeeder {
    pub(crate) fn new(
        id: usize,
        board_size: usize,
        input: mpsc::Sender<Slot>,
        shutdown: watch::Receiver<bool>,
        tempo: BotTempo,
    ) -> Self {
        Self {
            id,
            board_size,
            input,
            shutdown,
            tempo,
        }
    }

    pub(crate) async fn run(mut self) {
        info!("bot feeder {} starting ({})", self.id, self.tempo);
        let (base, jitter) = self.tempo.think_delay();
        loop {
            if *self.shutdown.borrow() {
                break;
            }
            let delay = base + jitter.mul_f64(rand::rng().random_range(0.0..=1.0));
            tokio::select! {
                _ = self.shutdown.changed() => break,
                _ = time::sleep(delay) => {}
            }
            let slot = rand::rng().random_range(0..self.board_size);
            match self.input.try_send(slot) {
                Ok(()) => {}
                // A full inbox means the player is parked on a verdict;
                // dropping the press mirrors a keypress nobody consumed.
                Err(mpsc::error::TrySendError::Full(_)) => {
                    debug!("bot {} pressed slot {slot} into a full inbox", self.id);
                }
                Err(mpsc::error::TrySendError::Closed(_)) => break,
            }
        }
        info!("bot feeder {} terminated", self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn feeder_presses_in_range_until_shutdown() {
        let (input_tx, mut input_rx) = mpsc::channel(64);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let feeder = BotFeeder::new(3, 12, input_tx, shutdown_rx, BotTempo::Frenzied);
        let task = tokio::spawn(feeder.run());

        time::sleep(Duration::from_secs(2)).await;
        shutdown_tx.send(true).unwrap();
        task.await.unwrap();

        let mut presses = 0;
        while let Ok(slot) = input_rx.try_recv() {
            assert!(slot < 12);
            presses += 1;
        }
        assert!(presses > 0, "frenzied bot never pressed in two seconds");
    }
}
