//! Combat simulation: arena, damage table, round resolution, engine.

pub mod arena;
pub mod damage;
pub mod engine;
pub mod round;

pub use arena::{CardArena, Side};
pub use damage::{effective_damage, Damage};
pub use engine::{BattleEngine, MatchResult, Verdict, ROUND_CAP};
pub use round::{resolve, RoundOutcome, RoundResult};
