//! Player actor implementation.
//!
//! One task per seat. The actor converts selection events into token
//! toggles on the shared board; the press that completes a full selection
//! enqueues a claim and parks the actor on its release channel until the
//! dealer has adjudicated and the resulting cooldown has expired. Presses
//! arriving while parked stay queued in the bounded inbox.

use crate::{
    dealer::messages::Claim,
    game::{Board, PlayerId, Slot, TokenChange},
};
use log::{debug, info};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

pub(crate) struct PlayerActor {
    id: PlayerId,
    board: Arc<Board>,
    inbox: mpsc::Receiver<Slot>,
    claims: mpsc::Sender<Claim>,
    release: mpsc::Receiver<()>,
    shutdown: watch::Receiver<bool>,
}

impl PlayerActor {
    pub(crate) fn new(
        id: PlayerId,
        board: Arc<Board>,
        inbox: mpsc::Receiver<Slot>,
        claims: mpsc::Sender<Claim>,
        release: mpsc::Receiver<()>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            id,
            board,
            inbox,
            claims,
            release,
            shutdown,
        }
    }

    pub(crate) async fn run(mut self) {
        info!("player {} starting", self.id);
        loop {
            if *self.shutdown.borrow() {
                break;
            }
            let slot = {
                let inbox = &mut self.inbox;
                let shutdown = &mut self.shutdown;
                tokio::select! {
                    _ = shutdown.changed() => break,
                    received = inbox.recv() => match received {
                        Some(slot) => slot,
                        None => break,
                    },
                }
            };
            if self.handle_press(slot) && !self.await_verdict().await {
                break;
            }
        }
        info!("player {} terminated", self.id);
    }

    /// Toggle the token for one press. Returns true when the press
    /// completed a full selection and a claim was submitted.
    fn handle_press(&self, slot: Slot) -> bool {
        match self.board.toggle_token(self.id, slot) {
            TokenChange::Placed { tokens } => {
                debug!("player {} marked slot {slot} ({tokens} tokens)", self.id);
                if tokens == self.board.arity() {
                    // try_send keeps the board lock discipline simple: the
                    // claim queue is sized for one claim per player, and a
                    // player cannot have two outstanding claims.
                    if self.claims.try_send(Claim { player: self.id }).is_err() {
                        debug!("player {} claim queue unavailable", self.id);
                        return false;
                    }
                    return true;
                }
                false
            }
            TokenChange::Removed { tokens } => {
                debug!("player {} unmarked slot {slot} ({tokens} tokens)", self.id);
                false
            }
            TokenChange::Ignored => false,
        }
    }

    /// Park until the dealer releases this player. Returns false when the
    /// game shut down instead.
    async fn await_verdict(&mut self) -> bool {
        let release = &mut self.release;
        let shutdown = &mut self.shutdown;
        tokio::select! {
            _ = shutdown.changed() => false,
            released = release.recv() => released.is_some(),
        }
    }
}
