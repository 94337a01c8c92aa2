//! Elo rating math and the post-match rating update service.

pub mod elo;
pub mod service;

pub use elo::{
    expected_score, k_factor, rating_delta, MatchOutcome, K_ESTABLISHED, K_PROVISIONAL,
    PROVISIONAL_GAMES,
};
pub use service::{MemoryRatingStore, RatingService, RatingStore};
