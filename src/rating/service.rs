//! Rating updates after a finished match.
//!
//! Both players' records are computed from one pre-match snapshot and
//! written back together. The service serializes its read-modify-write
//! cycle so two concurrently finishing matches that share a player cannot
//! lose an update.

use std::sync::Arc;

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use tokio::sync::Mutex;

use crate::core::{PlayerId, PlayerStats};
use crate::error::Result;

use super::elo::{rating_delta, MatchOutcome};

/// Storage port for per-player rating records.
///
/// `load` must return default stats (1000 Elo, no games) for unknown
/// players. `store_pair` must write both records as one unit.
#[async_trait]
pub trait RatingStore: Send + Sync {
    async fn load(&self, player: PlayerId) -> Result<PlayerStats>;
    async fn store_pair(
        &self,
        a: (PlayerId, PlayerStats),
        b: (PlayerId, PlayerStats),
    ) -> Result<()>;
}

/// In-memory rating store for tests and embedded use.
#[derive(Debug, Default)]
pub struct MemoryRatingStore {
    records: Mutex<FxHashMap<PlayerId, PlayerStats>>,
}

impl MemoryRatingStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current stats for a player, if any match touched them.
    pub async fn stats(&self, player: PlayerId) -> Option<PlayerStats> {
        self.records.lock().await.get(&player).copied()
    }
}

#[async_trait]
impl RatingStore for MemoryRatingStore {
    async fn load(&self, player: PlayerId) -> Result<PlayerStats> {
        Ok(self
            .records
            .lock()
            .await
            .get(&player)
            .copied()
            .unwrap_or_default())
    }

    async fn store_pair(
        &self,
        a: (PlayerId, PlayerStats),
        b: (PlayerId, PlayerStats),
    ) -> Result<()> {
        let mut records = self.records.lock().await;
        records.insert(a.0, a.1);
        records.insert(b.0, b.1);
        Ok(())
    }
}

/// Applies a match outcome to both participants' rating records.
pub struct RatingService {
    store: Arc<dyn RatingStore>,
    // Serializes load -> compute -> store across concurrent matches.
    update_lock: Mutex<()>,
}

impl RatingService {
    /// Create a service over a rating store.
    #[must_use]
    pub fn new(store: Arc<dyn RatingStore>) -> Self {
        Self {
            store,
            update_lock: Mutex::new(()),
        }
    }

    /// Update both players after a match.
    ///
    /// `outcome` is read from `player`'s perspective. Both deltas are
    /// computed from the pre-match snapshot, so the update is symmetric:
    /// the opponent's expected score is evaluated against `player`'s old
    /// rating, not the freshly updated one.
    pub async fn apply(
        &self,
        player: PlayerId,
        opponent: PlayerId,
        outcome: MatchOutcome,
    ) -> Result<()> {
        let _guard = self.update_lock.lock().await;

        let mut a = self.store.load(player).await?;
        let mut b = self.store.load(opponent).await?;

        let delta_a = rating_delta(a.elo, b.elo, a.games, outcome);
        let delta_b = rating_delta(b.elo, a.elo, b.games, outcome.invert());

        a.elo += delta_a;
        b.elo += delta_b;
        a.record(outcome);
        b.record(outcome.invert());

        tracing::debug!(
            %player, %opponent, ?outcome, delta_a, delta_b,
            "ratings updated"
        );

        self.store.store_pair((player, a), (opponent, b)).await
    }
}
