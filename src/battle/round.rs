//! Round resolution: draw, compare damage, relocate the loser's card.

use serde::{Deserialize, Serialize};

use crate::core::{BattleRng, CardId};
use crate::error::{BattleError, Result};

use super::arena::{CardArena, Side};
use super::damage::{effective_damage, Damage};

/// Outcome tag of a single round, from side A's perspective.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundResult {
    WinA,
    WinB,
    Draw,
}

/// Everything that happened in one round.
///
/// Transient: produced by [`resolve`], consumed by the engine's transcript
/// builder within the same iteration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundOutcome {
    /// Card side A fielded.
    pub card_a: CardId,
    /// Card side B fielded.
    pub card_b: CardId,
    /// Effective damage A dealt to B.
    pub damage_a: Damage,
    /// Effective damage B dealt to A.
    pub damage_b: Damage,
    /// Who took the round.
    pub result: RoundResult,
}

impl RoundOutcome {
    /// The winning side, or `None` on a draw.
    #[must_use]
    pub fn winner(&self) -> Option<Side> {
        match self.result {
            RoundResult::WinA => Some(Side::A),
            RoundResult::WinB => Some(Side::B),
            RoundResult::Draw => None,
        }
    }

    /// The card that changed hands, or `None` on a draw.
    #[must_use]
    pub fn transferred_card(&self) -> Option<CardId> {
        match self.result {
            RoundResult::WinA => Some(self.card_b),
            RoundResult::WinB => Some(self.card_a),
            RoundResult::Draw => None,
        }
    }
}

/// Resolve one round.
///
/// Draws one random card per side (the draw itself never removes a card),
/// computes damage in both directions, and on a decisive outcome relocates
/// the loser's card to the winner's deck. A draw moves nothing.
pub fn resolve(arena: &mut CardArena, rng: &mut BattleRng) -> Result<RoundOutcome> {
    let card_a = arena
        .draw(Side::A, rng)
        .ok_or(BattleError::EmptyDeck(Side::A))?;
    let card_b = arena
        .draw(Side::B, rng)
        .ok_or(BattleError::EmptyDeck(Side::B))?;

    let (damage_a, damage_b) = {
        let a = arena.card(card_a);
        let b = arena.card(card_b);
        (effective_damage(a, b), effective_damage(b, a))
    };

    let result = match damage_a.cmp(&damage_b) {
        std::cmp::Ordering::Greater => {
            arena.transfer(card_b, Side::B);
            RoundResult::WinA
        }
        std::cmp::Ordering::Less => {
            arena.transfer(card_a, Side::A);
            RoundResult::WinB
        }
        std::cmp::Ordering::Equal => RoundResult::Draw,
    };

    Ok(RoundOutcome {
        card_a,
        card_b,
        damage_a,
        damage_b,
        result,
    })
}
