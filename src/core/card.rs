//! Card value types.
//!
//! A `Card` is an immutable value: once created its stats never change.
//! During a battle a card is only ever *relocated* between the two deck
//! containers (see `battle::arena`), never mutated or duplicated.
//!
//! Elements and classes drive the damage table in `battle::damage`.

use serde::{Deserialize, Serialize};

use super::ids::CardId;

/// Elemental affinity of a card.
///
/// `Regular` means no elemental affinity; such cards neither give nor
/// receive elemental modifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Fire,
    Water,
    Air,
    Ice,
    Plant,
    Electro,
    Ground,
    Regular,
}

/// Creature class of a card.
///
/// `Regular` covers plain monsters and spells with no class rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardClass {
    Dragon,
    Goblin,
    Elf,
    Wizard,
    Dwarf,
    Orc,
    Kraken,
    Vampire,
    Trap,
    Troll,
    Knight,
    Regular,
}

/// Whether a card is a creature or a spell.
///
/// The distinction feeds exactly one damage rule: a Kraken attacker deals
/// zero damage to spell-kind defenders. See `battle::damage`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    Monster,
    Spell,
}

/// An immutable card value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// Unique id within the match's card arena.
    pub id: CardId,
    /// Display name, used in transcripts.
    pub name: String,
    /// Base damage stat before any modifier.
    pub damage: f32,
    /// Elemental affinity.
    pub element: Element,
    /// Creature class.
    pub class: CardClass,
    /// Monster or spell.
    pub kind: CardKind,
}

impl Card {
    /// Create a card with explicit element, class, and kind.
    #[must_use]
    pub fn new(
        id: CardId,
        name: impl Into<String>,
        damage: f32,
        element: Element,
        class: CardClass,
        kind: CardKind,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            damage,
            element,
            class,
            kind,
        }
    }

    /// Convenience constructor for a monster card.
    #[must_use]
    pub fn monster(
        id: CardId,
        name: impl Into<String>,
        damage: f32,
        element: Element,
        class: CardClass,
    ) -> Self {
        Self::new(id, name, damage, element, class, CardKind::Monster)
    }

    /// Convenience constructor for a spell card (no creature class).
    #[must_use]
    pub fn spell(id: CardId, name: impl Into<String>, damage: f32, element: Element) -> Self {
        Self::new(id, name, damage, element, CardClass::Regular, CardKind::Spell)
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.damage)
    }
}
