//! Participants and their rating state.

use serde::{Deserialize, Serialize};

use super::ids::PlayerId;
use crate::rating::MatchOutcome;

/// A player taking part in a match.
///
/// Only identity and display name live here; the rating state is owned by
/// the rating store and read through `rating::RatingStore`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Unique player id.
    pub id: PlayerId,
    /// Display name, used in transcripts.
    pub name: String,
}

impl Participant {
    /// Create a participant.
    #[must_use]
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Per-player rating record.
///
/// New players start at 1000 Elo with no games played.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    /// Current Elo rating.
    pub elo: i32,
    /// Total matches played.
    pub games: u32,
    /// Matches won.
    pub wins: u32,
    /// Matches lost.
    pub losses: u32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            elo: 1000,
            games: 0,
            wins: 0,
            losses: 0,
        }
    }
}

impl PlayerStats {
    /// Count one finished match. Draws bump the game count only.
    pub fn record(&mut self, outcome: MatchOutcome) {
        self.games += 1;
        match outcome {
            MatchOutcome::Win => self.wins += 1,
            MatchOutcome::Loss => self.losses += 1,
            MatchOutcome::Draw => {}
        }
    }

    /// Win/loss ratio; losses are floored at one to keep the value finite.
    #[must_use]
    pub fn win_loss_ratio(&self) -> f64 {
        f64::from(self.wins) / f64::from(self.losses.max(1))
    }
}
