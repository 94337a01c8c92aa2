//! Top-level match orchestration.
//!
//! `request_match` ties the subsystems together: validate the deck, enter
//! the lobby, and either run the battle (the pairing side) or hand back a
//! pending ticket (the waiting side). The pairing entrant executes the
//! engine, applies ratings, persists the transcript, and delivers the
//! result to the waiter over a oneshot.
//!
//! Rating and transcript persistence are best-effort: a failed write is
//! logged and the already-computed result still reaches both callers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use tokio::sync::{oneshot, Mutex};

use crate::battle::{BattleEngine, CardArena, MatchResult};
use crate::core::{BattleRng, Card, MatchId, Participant, PlayerId};
use crate::error::{BattleError, Result};
use crate::lobby::{LobbyCoordinator, Pairing};
use crate::rating::{MatchOutcome, RatingService, RatingStore};

/// Deck storage port.
#[async_trait]
pub trait DeckSource: Send + Sync {
    /// Load a player's configured deck. An empty return is mapped to
    /// `NoDeckConfigured` by the orchestrator.
    async fn load_deck(&self, player: PlayerId) -> Result<Vec<Card>>;
}

/// Transcript persistence port. Best-effort; failures are non-fatal.
#[async_trait]
pub trait TranscriptSink: Send + Sync {
    async fn persist(&self, match_id: MatchId, transcript: &str) -> Result<()>;
}

/// What a match request produced.
#[derive(Debug)]
pub enum MatchDecision {
    /// The caller was paired immediately and the battle ran to completion.
    Completed(MatchResult),
    /// No opponent yet; await the ticket (or poll again later).
    Pending(MatchTicket),
}

/// Everything the pairing side needs to battle a waiting player.
#[derive(Debug)]
struct PendingEntry {
    participant: Participant,
    deck: Vec<Card>,
    result_tx: oneshot::Sender<MatchResult>,
}

type WaitingMap = Arc<Mutex<FxHashMap<PlayerId, PendingEntry>>>;

/// Handle held by a waiting caller until its match completes.
#[derive(Debug)]
pub struct MatchTicket {
    player: PlayerId,
    result_rx: oneshot::Receiver<MatchResult>,
    lobby: LobbyCoordinator,
    waiting: WaitingMap,
    // Keeps the lobby completion handle alive so the pairing entrant can
    // still signal this player.
    _pairing: crate::lobby::WaitTicket,
}

impl MatchTicket {
    /// The waiting player.
    #[must_use]
    pub fn player(&self) -> PlayerId {
        self.player
    }

    /// Suspend until an opponent arrives and the battle finishes.
    pub async fn wait(self) -> Result<MatchResult> {
        self.result_rx.await.map_err(|_| BattleError::LobbyClosed)
    }

    /// Like [`wait`](Self::wait) but with a deadline. On expiry the lobby
    /// entry is withdrawn; if the deadline races with a pairing, the
    /// pairing wins and the result is awaited anyway.
    pub async fn wait_timeout(mut self, timeout: Duration) -> Result<MatchResult> {
        match tokio::time::timeout(timeout, &mut self.result_rx).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(_)) => Err(BattleError::LobbyClosed),
            Err(_) => {
                let withdrawn = self.waiting.lock().await.remove(&self.player).is_some();
                self.lobby.withdraw(self.player).await;
                if withdrawn {
                    Err(BattleError::WaitTimeout)
                } else {
                    // A pairing consumed our snapshot; the battle is running.
                    self.result_rx.await.map_err(|_| BattleError::LobbyClosed)
                }
            }
        }
    }
}

/// Entry point for the battle subsystem.
///
/// Share it behind an `Arc`; every method takes `&self`.
pub struct MatchOrchestrator {
    lobby: LobbyCoordinator,
    waiting: WaitingMap,
    decks: Arc<dyn DeckSource>,
    transcripts: Arc<dyn TranscriptSink>,
    ratings: RatingService,
    next_match: AtomicU64,
    seed: Option<u64>,
}

impl MatchOrchestrator {
    /// Create an orchestrator over the three collaborator ports.
    #[must_use]
    pub fn new(
        decks: Arc<dyn DeckSource>,
        transcripts: Arc<dyn TranscriptSink>,
        ratings: Arc<dyn RatingStore>,
    ) -> Self {
        Self {
            lobby: LobbyCoordinator::new(),
            waiting: Arc::new(Mutex::new(FxHashMap::default())),
            decks,
            transcripts,
            ratings: RatingService::new(ratings),
            next_match: AtomicU64::new(0),
            seed: None,
        }
    }

    /// Fix the simulation seed; every match derives its RNG from it.
    /// Intended for deterministic tests and replays.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Request a match with the caller's deck snapshot.
    ///
    /// Returns `Pending` with a ticket when nobody is waiting, or runs the
    /// battle and returns `Completed` when an opponent was already queued.
    /// An empty deck is rejected before lobby entry.
    pub async fn request_match(
        &self,
        participant: Participant,
        deck: Vec<Card>,
    ) -> Result<MatchDecision> {
        if deck.is_empty() {
            return Err(BattleError::InvalidDeck(participant.id));
        }

        loop {
            // Register the snapshot before entering the queue so a
            // concurrent pairer always finds it.
            let (result_tx, result_rx) = oneshot::channel();
            {
                let mut waiting = self.waiting.lock().await;
                if waiting.contains_key(&participant.id) {
                    return Err(BattleError::AlreadyQueued(participant.id));
                }
                waiting.insert(
                    participant.id,
                    PendingEntry {
                        participant: participant.clone(),
                        deck: deck.clone(),
                        result_tx,
                    },
                );
            }

            match self.lobby.enter(participant.id).await {
                Ok(Pairing::Matched(opponent_id)) => {
                    // The pairing side battles; its own snapshot is unused.
                    self.waiting.lock().await.remove(&participant.id);

                    let Some(entry) = self.waiting.lock().await.remove(&opponent_id) else {
                        // Opponent withdrew between queue signal and snapshot
                        // lookup; queue up again.
                        tracing::debug!(opponent = %opponent_id, "opponent snapshot gone, re-entering");
                        continue;
                    };

                    let result = self.run_match(&participant, deck, entry).await?;
                    return Ok(MatchDecision::Completed(result));
                }
                Ok(Pairing::Waiting(pairing)) => {
                    return Ok(MatchDecision::Pending(MatchTicket {
                        player: participant.id,
                        result_rx,
                        lobby: self.lobby.clone(),
                        waiting: Arc::clone(&self.waiting),
                        _pairing: pairing,
                    }));
                }
                Err(err) => {
                    self.waiting.lock().await.remove(&participant.id);
                    return Err(err);
                }
            }
        }
    }

    /// Request a match, loading the caller's deck from the deck store.
    ///
    /// Fails with `NoDeckConfigured` when the store has no cards for the
    /// player.
    pub async fn request_match_for(&self, participant: Participant) -> Result<MatchDecision> {
        let deck = self.decks.load_deck(participant.id).await?;
        if deck.is_empty() {
            return Err(BattleError::NoDeckConfigured(participant.id));
        }
        self.request_match(participant, deck).await
    }

    /// Remove a waiting caller, e.g. on disconnect.
    pub async fn withdraw(&self, player: PlayerId) -> bool {
        let had_entry = self.waiting.lock().await.remove(&player).is_some();
        self.lobby.withdraw(player).await || had_entry
    }

    async fn run_match(
        &self,
        entrant: &Participant,
        entrant_deck: Vec<Card>,
        opponent: PendingEntry,
    ) -> Result<MatchResult> {
        if opponent.participant.id == entrant.id {
            return Err(BattleError::SelfMatch(entrant.id));
        }

        let match_id = MatchId::new(self.next_match.fetch_add(1, Ordering::Relaxed) + 1);
        let rng = match self.seed {
            Some(seed) => BattleRng::new(seed ^ match_id.raw()),
            None => BattleRng::from_entropy(),
        };

        // Entrant is side A, the waiting opponent side B.
        let arena = CardArena::new(entrant_deck, opponent.deck);
        let engine = BattleEngine::new(
            match_id,
            entrant.clone(),
            opponent.participant.clone(),
            arena,
            rng,
        );
        let result = engine.execute()?;

        let outcome = MatchOutcome::from(result.verdict);
        if let Err(err) = self
            .ratings
            .apply(entrant.id, opponent.participant.id, outcome)
            .await
        {
            tracing::warn!(%match_id, %err, "rating update failed");
        }
        if let Err(err) = self
            .transcripts
            .persist(match_id, &result.transcript)
            .await
        {
            tracing::warn!(%match_id, %err, "transcript persistence failed");
        }

        // Waiter may have timed out in the meantime; that only drops the clone.
        let _ = opponent.result_tx.send(result.clone());

        tracing::info!(
            %match_id,
            player_a = %entrant.id,
            player_b = %opponent.participant.id,
            verdict = ?result.verdict,
            rounds = result.rounds,
            "match completed"
        );

        Ok(result)
    }
}
