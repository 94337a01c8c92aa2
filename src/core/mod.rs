//! Core value types: ids, cards, participants, and the battle RNG.

pub mod card;
pub mod ids;
pub mod player;
pub mod rng;

pub use card::{Card, CardClass, CardKind, Element};
pub use ids::{CardId, MatchId, PlayerId};
pub use player::{Participant, PlayerStats};
pub use rng::BattleRng;
