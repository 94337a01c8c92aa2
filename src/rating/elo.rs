//! Elo rating math, pure and synchronous.
//!
//! Standard logistic expected-score formula with a two-tier K-factor:
//! new players (fewer than 30 games) move in bigger steps.

use serde::{Deserialize, Serialize};

use crate::battle::Verdict;

/// K-factor for players with fewer than [`PROVISIONAL_GAMES`] games.
pub const K_PROVISIONAL: f64 = 32.0;
/// K-factor for established players.
pub const K_ESTABLISHED: f64 = 24.0;
/// Games-played threshold between the two K tiers.
pub const PROVISIONAL_GAMES: u32 = 30;

/// Outcome of a match from one player's perspective.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    Win,
    Loss,
    Draw,
}

impl MatchOutcome {
    /// Actual score for the Elo update: 1, 0, or 0.5.
    #[must_use]
    pub fn score(self) -> f64 {
        match self {
            MatchOutcome::Win => 1.0,
            MatchOutcome::Loss => 0.0,
            MatchOutcome::Draw => 0.5,
        }
    }

    /// The same outcome from the opponent's perspective.
    #[must_use]
    pub fn invert(self) -> Self {
        match self {
            MatchOutcome::Win => MatchOutcome::Loss,
            MatchOutcome::Loss => MatchOutcome::Win,
            MatchOutcome::Draw => MatchOutcome::Draw,
        }
    }
}

/// A verdict read as side A's outcome.
impl From<Verdict> for MatchOutcome {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::WinA => MatchOutcome::Win,
            Verdict::WinB => MatchOutcome::Loss,
            Verdict::Draw => MatchOutcome::Draw,
        }
    }
}

/// Expected score of a `rating` player against an `opponent` player.
#[must_use]
pub fn expected_score(rating: i32, opponent: i32) -> f64 {
    1.0 / (1.0 + 10f64.powf(f64::from(opponent - rating) / 400.0))
}

/// K-factor for a player with `games` matches played.
#[must_use]
pub fn k_factor(games: u32) -> f64 {
    if games < PROVISIONAL_GAMES {
        K_PROVISIONAL
    } else {
        K_ESTABLISHED
    }
}

/// Signed rating change for one player after one match.
#[must_use]
pub fn rating_delta(rating: i32, opponent: i32, games: u32, outcome: MatchOutcome) -> i32 {
    let delta = k_factor(games) * (outcome.score() - expected_score(rating, opponent));
    delta.round() as i32
}
