//! Effective damage computation.
//!
//! Pure function of (attacker, defender). Two modifier steps run in a fixed
//! order so simulation results stay reproducible:
//!
//! 1. Elemental table (attacker element vs defender element). An absolute
//!    result produced here is final; the class step never re-scales it.
//! 2. Class table (attacker class vs defender class). Class absolutes
//!    override class multipliers.
//!
//! The one non-numeric rule is water vs the Knight class: heavy armor
//! drowns, an unconditional win modeled as [`Damage::Overwhelming`] rather
//! than a magic finite value, so no card stat can ever tie it.

use serde::{Deserialize, Serialize};

use crate::core::{Card, CardClass, CardKind, Element};

/// Effective damage of one attack.
///
/// Ordered: `Overwhelming` beats every finite value, finite values compare
/// by magnitude.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub enum Damage {
    /// Ordinary damage after all modifiers.
    Finite(f32),
    /// Unconditional-win override (water drowns Knights).
    Overwhelming,
}

impl Damage {
    /// The finite value, if any.
    #[must_use]
    pub fn finite(self) -> Option<f32> {
        match self {
            Damage::Finite(v) => Some(v),
            Damage::Overwhelming => None,
        }
    }
}

impl PartialEq for Damage {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for Damage {}

impl PartialOrd for Damage {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Damage {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering;
        match (self, other) {
            (Damage::Overwhelming, Damage::Overwhelming) => Ordering::Equal,
            (Damage::Overwhelming, Damage::Finite(_)) => Ordering::Greater,
            (Damage::Finite(_), Damage::Overwhelming) => Ordering::Less,
            (Damage::Finite(a), Damage::Finite(b)) => a.total_cmp(b),
        }
    }
}

impl std::fmt::Display for Damage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Damage::Finite(v) => write!(f, "{v}"),
            Damage::Overwhelming => write!(f, "overwhelming"),
        }
    }
}

/// Compute the effective damage `attacker` deals to `defender`.
#[must_use]
pub fn effective_damage(attacker: &Card, defender: &Card) -> Damage {
    let mut damage = attacker.damage;

    // Elemental step. Absolute results here are final.
    match attacker.element {
        Element::Fire => {
            if defender.element == Element::Water {
                damage /= 2.0;
            }
            if defender.element == Element::Ice {
                damage *= 2.0;
            }
            if defender.element == Element::Plant {
                damage *= 2.0;
            }
        }
        Element::Water => {
            if defender.class == CardClass::Knight {
                return Damage::Overwhelming;
            }
            if defender.element == Element::Ice {
                damage /= 2.0;
            }
            if defender.element == Element::Fire {
                damage *= 2.0;
            }
        }
        Element::Air => {
            if defender.element == Element::Electro {
                damage /= 2.0;
            }
        }
        Element::Ice => {
            if defender.element == Element::Fire {
                damage /= 2.0;
            }
            if defender.element == Element::Water {
                damage *= 2.0;
            }
        }
        Element::Plant => {
            if defender.element == Element::Fire {
                damage /= 2.0;
            }
            if defender.element == Element::Ground {
                damage *= 2.0;
            }
        }
        Element::Electro => {
            if defender.element == Element::Ground {
                return Damage::Finite(0.0);
            }
            if defender.element == Element::Water {
                damage *= 2.0;
            }
        }
        Element::Ground => {
            if defender.element == Element::Plant {
                damage /= 2.0;
            }
            if defender.element == Element::Electro {
                damage *= 2.0;
            }
        }
        Element::Regular => {}
    }

    // Class step. Absolutes override multipliers.
    match attacker.class {
        CardClass::Goblin => {
            // Goblins are too afraid of Dragons to attack.
            if defender.class == CardClass::Dragon {
                return Damage::Finite(0.0);
            }
        }
        CardClass::Elf => {
            if matches!(
                defender.class,
                CardClass::Dragon | CardClass::Dwarf | CardClass::Orc | CardClass::Goblin
            ) {
                damage *= 2.0;
            }
        }
        CardClass::Wizard => {
            // Wizards mind-control Orcs and Goblins into missing.
            if matches!(defender.class, CardClass::Orc | CardClass::Goblin) {
                return Damage::Finite(0.0);
            }
        }
        CardClass::Dwarf => {
            if defender.class == CardClass::Dragon {
                damage *= 2.0;
            }
        }
        CardClass::Kraken => {
            // Krakens are immune to spells.
            if defender.kind == CardKind::Spell {
                return Damage::Finite(0.0);
            }
            if defender.class == CardClass::Trap {
                damage *= 2.0;
            }
        }
        CardClass::Vampire => {
            // Knights are immune to Vampires.
            if defender.class == CardClass::Knight {
                return Damage::Finite(0.0);
            }
            if matches!(
                defender.class,
                CardClass::Elf | CardClass::Dwarf | CardClass::Orc | CardClass::Goblin
            ) {
                damage *= 2.0;
            }
        }
        CardClass::Trap => {
            if defender.class == CardClass::Troll {
                damage *= 2.0;
            }
        }
        _ => {}
    }

    Damage::Finite(damage)
}
