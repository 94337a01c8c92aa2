//! Card arena: match-scoped card storage and deck membership.
//!
//! Every card in a match lives in one arena, indexed by id. Which deck a
//! card belongs to is pure membership: winning a round transfers the
//! loser's card id to the winner's list, the card value itself never moves
//! or gets cloned. This keeps `|A| + |B|` trivially invariant and rules out
//! aliased card objects across decks.
//!
//! The arena is exclusively owned by the single battle execution holding
//! it; no locking is needed.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::rng::BattleRng;
use crate::core::{Card, CardId};

/// One of the two sides of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    /// The opposing side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    const fn index(self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::A => write!(f, "A"),
            Side::B => write!(f, "B"),
        }
    }
}

/// Cards of one match, with deck ownership expressed as side membership.
///
/// Decks start at four cards, so the membership lists stay inline in the
/// common case.
#[derive(Clone, Debug, Default)]
pub struct CardArena {
    cards: FxHashMap<CardId, Card>,
    membership: [SmallVec<[CardId; 8]>; 2],
}

impl CardArena {
    /// Build an arena from the two starting decks.
    ///
    /// Panics if the same card id appears twice; a card cannot be in both
    /// decks at once.
    #[must_use]
    pub fn new(deck_a: Vec<Card>, deck_b: Vec<Card>) -> Self {
        let mut arena = Self::default();
        for card in deck_a {
            arena.insert(card, Side::A);
        }
        for card in deck_b {
            arena.insert(card, Side::B);
        }
        arena
    }

    fn insert(&mut self, card: Card, side: Side) {
        let id = card.id;
        if self.cards.insert(id, card).is_some() {
            panic!("{id} already exists in the arena");
        }
        self.membership[side.index()].push(id);
    }

    /// Look up a card by id.
    ///
    /// Panics if the id is not in the arena.
    #[must_use]
    pub fn card(&self, id: CardId) -> &Card {
        &self.cards[&id]
    }

    /// Ids currently owned by a side.
    #[must_use]
    pub fn side_cards(&self, side: Side) -> &[CardId] {
        &self.membership[side.index()]
    }

    /// Number of cards a side currently owns.
    #[must_use]
    pub fn count(&self, side: Side) -> usize {
        self.membership[side.index()].len()
    }

    /// Whether a side has run out of cards.
    #[must_use]
    pub fn is_empty(&self, side: Side) -> bool {
        self.membership[side.index()].is_empty()
    }

    /// Total number of cards in the match. Constant across rounds.
    #[must_use]
    pub fn total(&self) -> usize {
        self.cards.len()
    }

    /// Draw a uniformly random card id from a side without removing it.
    ///
    /// Returns `None` when the side is empty.
    pub fn draw(&self, side: Side, rng: &mut BattleRng) -> Option<CardId> {
        let cards = self.side_cards(side);
        let idx = rng.pick_index(cards.len())?;
        Some(cards[idx])
    }

    /// Transfer a card from `from` to the opposing side.
    ///
    /// Returns `false` if the card is not currently owned by `from`.
    pub fn transfer(&mut self, id: CardId, from: Side) -> bool {
        let owned = &mut self.membership[from.index()];
        let Some(pos) = owned.iter().position(|&c| c == id) else {
            return false;
        };
        owned.swap_remove(pos);
        self.membership[from.opponent().index()].push(id);
        true
    }
}
