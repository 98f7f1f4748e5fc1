//! Static cosmetic catalog.
//!
//! # Responsibility
//! - Hold the full registry of unlockable avatar cosmetics.
//! - Answer unlocked/locked queries for a given level.
//!
//! # Invariants
//! - The catalog is compiled in as a `const` table and never mutated.
//! - Declaration order is part of the contract: it breaks unlock-level ties.

use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Closed set of cosmetic slots on the avatar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CosmeticCategory {
    Hat,
    Outfit,
    Accessory,
    Background,
}

/// One unlockable avatar item.
///
/// `emoji` is the fallback display glyph for presentation layers without
/// sprite assets; the core does no rendering itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cosmetic {
    pub id: &'static str,
    pub category: CosmeticCategory,
    pub name: &'static str,
    pub emoji: &'static str,
    /// Minimum level at which the item is unlocked (inclusive).
    pub unlock_level: u32,
}

const fn cosmetic(
    id: &'static str,
    category: CosmeticCategory,
    name: &'static str,
    emoji: &'static str,
    unlock_level: u32,
) -> Cosmetic {
    Cosmetic {
        id,
        category,
        name,
        emoji,
        unlock_level,
    }
}

const COSMETICS: &[Cosmetic] = &[
    // Hats
    cosmetic("hat_cap", CosmeticCategory::Hat, "Baseball Cap", "\u{1F9E2}", 2),
    cosmetic("hat_crown", CosmeticCategory::Hat, "Crown", "\u{1F451}", 5),
    cosmetic("hat_wizard", CosmeticCategory::Hat, "Wizard Hat", "\u{1F3A9}", 10),
    cosmetic("hat_party", CosmeticCategory::Hat, "Party Hat", "\u{1F389}", 15),
    // Outfits
    cosmetic("outfit_casual", CosmeticCategory::Outfit, "Casual Wear", "\u{1F455}", 3),
    cosmetic("outfit_formal", CosmeticCategory::Outfit, "Formal Suit", "\u{1F935}", 7),
    cosmetic("outfit_superhero", CosmeticCategory::Outfit, "Superhero Cape", "\u{1F9B8}", 12),
    cosmetic("outfit_ninja", CosmeticCategory::Outfit, "Ninja Outfit", "\u{1F977}", 18),
    // Accessories
    cosmetic("acc_sunglasses", CosmeticCategory::Accessory, "Cool Sunglasses", "\u{1F60E}", 4),
    cosmetic("acc_briefcase", CosmeticCategory::Accessory, "Briefcase", "\u{1F4BC}", 8),
    cosmetic("acc_trophy", CosmeticCategory::Accessory, "Trophy", "\u{1F3C6}", 20),
    // Backgrounds
    cosmetic("bg_forest", CosmeticCategory::Background, "Forest", "\u{1F332}", 6),
    cosmetic("bg_city", CosmeticCategory::Background, "City", "\u{1F3D9}\u{FE0F}", 11),
    cosmetic("bg_space", CosmeticCategory::Background, "Space", "\u{1F30C}", 16),
];

/// Full catalog in declaration order, stable across calls.
pub fn all() -> &'static [Cosmetic] {
    COSMETICS
}

/// Looks one cosmetic up by its stable id.
pub fn find(id: &str) -> Option<&'static Cosmetic> {
    COSMETICS.iter().find(|item| item.id == id)
}

/// Cosmetics unlocked at the given level, in catalog order.
///
/// The filter is inclusive: an item with `unlock_level == level` counts as
/// unlocked.
pub fn unlocked_for(level: u32) -> Vec<&'static Cosmetic> {
    COSMETICS
        .iter()
        .filter(|item| item.unlock_level <= level)
        .collect()
}

/// Per-category best item among the given unlocked cosmetics.
///
/// "Best" is the highest `unlock_level`; equal levels resolve to the item
/// that appears first in catalog order. Categories with no unlocked item
/// are absent from the result.
pub fn best_per_category(
    unlocked: &[&'static Cosmetic],
) -> BTreeMap<CosmeticCategory, &'static Cosmetic> {
    let mut best: BTreeMap<CosmeticCategory, &'static Cosmetic> = BTreeMap::new();
    for item in unlocked.iter().copied() {
        match best.entry(item.category) {
            Entry::Vacant(slot) => {
                slot.insert(item);
            }
            Entry::Occupied(mut slot) => {
                // strictly greater, so the first-declared item wins ties
                if item.unlock_level > slot.get().unlock_level {
                    slot.insert(item);
                }
            }
        }
    }
    best
}

/// The still-locked cosmetic with the smallest unlock level.
///
/// Returns `None` once every catalog item is unlocked; that terminal state
/// is stable for any higher level.
pub fn next_unlock(level: u32) -> Option<&'static Cosmetic> {
    let mut next: Option<&'static Cosmetic> = None;
    for item in COSMETICS {
        if item.unlock_level <= level {
            continue;
        }
        // strictly smaller, so catalog order breaks ties
        match next {
            Some(current) if item.unlock_level >= current.unlock_level => {}
            _ => next = Some(item),
        }
    }
    next
}
