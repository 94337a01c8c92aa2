//! Matchmaking rendezvous.
//!
//! A single mutex guards the FIFO queue of waiting players together with
//! their completion handles; check-queue, enqueue-or-dequeue, and
//! register-or-signal all happen inside one critical section. Splitting
//! that up would let two entrants dequeue the same waiting player.
//!
//! Suspension is a `oneshot` completed exactly once by the pairing
//! entrant. The waiting side holds a [`WaitTicket`] and awaits it, with an
//! optional deadline that withdraws the queue entry on expiry so a
//! disconnecting caller cannot leak lobby state.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use rustc_hash::FxHashMap;
use tokio::sync::{oneshot, Mutex};

use crate::core::PlayerId;
use crate::error::{BattleError, Result};

#[derive(Debug, Default)]
struct LobbyState {
    queue: VecDeque<PlayerId>,
    handles: FxHashMap<PlayerId, oneshot::Sender<PlayerId>>,
}

/// Result of entering the lobby.
#[derive(Debug)]
pub enum Pairing {
    /// An opponent was already waiting; the caller is the pairing side.
    Matched(PlayerId),
    /// Nobody was waiting; hold the ticket and await an opponent.
    Waiting(WaitTicket),
}

/// Completion handle for a waiting player.
///
/// Dropping the ticket without calling [`wait`](Self::wait) or
/// [`LobbyCoordinator::withdraw`] leaves a stale queue entry; stale
/// entries are skipped (not matched) by later entrants.
#[derive(Debug)]
pub struct WaitTicket {
    player: PlayerId,
    rx: oneshot::Receiver<PlayerId>,
    state: Arc<Mutex<LobbyState>>,
}

impl WaitTicket {
    /// The waiting player.
    #[must_use]
    pub fn player(&self) -> PlayerId {
        self.player
    }

    /// Suspend until an opponent pairs with this player.
    pub async fn wait(self) -> Result<PlayerId> {
        self.rx.await.map_err(|_| BattleError::LobbyClosed)
    }

    /// Like [`wait`](Self::wait), but gives up after `timeout` and removes
    /// the queue entry.
    ///
    /// If pairing and expiry race, the pairing wins: the opponent id is
    /// returned instead of `WaitTimeout`.
    pub async fn wait_timeout(mut self, timeout: Duration) -> Result<PlayerId> {
        match tokio::time::timeout(timeout, &mut self.rx).await {
            Ok(Ok(opponent)) => Ok(opponent),
            Ok(Err(_)) => Err(BattleError::LobbyClosed),
            Err(_) => {
                let mut state = self.state.lock().await;
                if state.handles.remove(&self.player).is_some() {
                    state.queue.retain(|&p| p != self.player);
                    tracing::debug!(player = %self.player, "lobby wait timed out");
                    Err(BattleError::WaitTimeout)
                } else {
                    // The handle is gone: an opponent signaled us while the
                    // deadline fired.
                    drop(state);
                    match self.rx.try_recv() {
                        Ok(opponent) => Ok(opponent),
                        Err(_) => Err(BattleError::LobbyClosed),
                    }
                }
            }
        }
    }
}

/// Pairs two concurrently arriving players, FIFO.
///
/// Cloning is cheap and shares the underlying queue.
#[derive(Clone, Debug, Default)]
pub struct LobbyCoordinator {
    state: Arc<Mutex<LobbyState>>,
}

impl LobbyCoordinator {
    /// Create an empty lobby.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the lobby.
    ///
    /// If someone is already waiting, the longest-waiting player is
    /// dequeued, signaled with the caller's id, and returned as
    /// [`Pairing::Matched`]. Otherwise the caller is enqueued and receives
    /// a [`WaitTicket`]. Re-entry while already queued fails with
    /// `AlreadyQueued` rather than creating a duplicate entry.
    pub async fn enter(&self, player: PlayerId) -> Result<Pairing> {
        let mut state = self.state.lock().await;

        if state.handles.contains_key(&player) {
            return Err(BattleError::AlreadyQueued(player));
        }

        while let Some(head) = state.queue.pop_front() {
            debug_assert_ne!(head, player, "self-match in lobby queue");
            if let Some(tx) = state.handles.remove(&head) {
                if tx.send(player).is_ok() {
                    tracing::info!(waiter = %head, entrant = %player, "lobby pairing");
                    return Ok(Pairing::Matched(head));
                }
                // Receiver dropped without withdrawing; skip the stale entry.
                tracing::debug!(player = %head, "skipping stale lobby entry");
            }
        }

        let (tx, rx) = oneshot::channel();
        state.queue.push_back(player);
        state.handles.insert(player, tx);
        tracing::debug!(%player, "waiting in lobby");

        Ok(Pairing::Waiting(WaitTicket {
            player,
            rx,
            state: Arc::clone(&self.state),
        }))
    }

    /// Remove a queued player, e.g. on caller disconnect.
    ///
    /// Returns `true` if the player was still waiting.
    pub async fn withdraw(&self, player: PlayerId) -> bool {
        let mut state = self.state.lock().await;
        let was_waiting = state.handles.remove(&player).is_some();
        if was_waiting {
            state.queue.retain(|&p| p != player);
            tracing::debug!(%player, "withdrew from lobby");
        }
        was_waiting
    }

    /// Number of players currently waiting.
    pub async fn waiting(&self) -> usize {
        self.state.lock().await.handles.len()
    }
}
