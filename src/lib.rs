//! # tcg-arena
//!
//! Battle orchestration core for a trading-card-game service: players own
//! cards, assemble a deck, get paired in a matchmaking lobby, battle round
//! by round under elemental/class interaction rules, and have an Elo-style
//! rating applied to the outcome.
//!
//! ## Design Principles
//!
//! 1. **Cards never alias**: each match owns a `CardArena`; deck ownership
//!    is side membership, and winning a round transfers an id, not a clone.
//!
//! 2. **One suspension point**: only the lobby rendezvous awaits. The round
//!    loop, damage table, and rating math are pure synchronous computation.
//!
//! 3. **Deterministic simulation**: every engine run owns a seedable
//!    ChaCha8 RNG; a recorded seed replays a match exactly.
//!
//! 4. **Degrade, don't crash**: faults inside a running simulation produce
//!    a safe partial result, and persistence failures never withhold a
//!    result from players who were already paired.
//!
//! ## Modules
//!
//! - `core`: ids, cards, participants, rating records, battle RNG
//! - `battle`: card arena, damage table, round resolver, battle engine
//! - `lobby`: FIFO matchmaking rendezvous with oneshot completion handles
//! - `rating`: Elo math and the post-match rating update service
//! - `orchestrator`: top-level `request_match` entry point and its ports
//! - `error`: crate-wide error taxonomy

pub mod battle;
pub mod core;
pub mod error;
pub mod lobby;
pub mod orchestrator;
pub mod rating;

// Re-export commonly used types
pub use crate::core::{
    BattleRng, Card, CardClass, CardId, CardKind, Element, MatchId, Participant, PlayerId,
    PlayerStats,
};

pub use crate::battle::{
    effective_damage, BattleEngine, CardArena, Damage, MatchResult, RoundOutcome, RoundResult,
    Side, Verdict, ROUND_CAP,
};

pub use crate::lobby::{LobbyCoordinator, Pairing, WaitTicket};

pub use crate::rating::{
    expected_score, k_factor, rating_delta, MatchOutcome, MemoryRatingStore, RatingService,
    RatingStore,
};

pub use crate::orchestrator::{
    DeckSource, MatchDecision, MatchOrchestrator, MatchTicket, TranscriptSink,
};

pub use crate::error::{BattleError, Result};
