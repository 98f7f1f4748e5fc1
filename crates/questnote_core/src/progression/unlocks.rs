//! Unlock resolution for level transitions.
//!
//! # Responsibility
//! - Report every cosmetic newly reached by a level transition.
//! - Build the level-up payload the notification flow consumes.
//!
//! # Invariants
//! - One transition `(old_level, new_level)` covers all levels gained by a
//!   single award; no unlock is skipped when several levels are crossed.

use crate::progression::catalog::{self, Cosmetic};
use serde::Serialize;

/// Cosmetics whose unlock level lies in `(old_level, new_level]`.
///
/// Ordered by unlock level ascending; equal levels keep catalog order.
pub fn newly_unlocked(old_level: u32, new_level: u32) -> Vec<&'static Cosmetic> {
    let mut items: Vec<&'static Cosmetic> = catalog::all()
        .iter()
        .filter(|item| old_level < item.unlock_level && item.unlock_level <= new_level)
        .collect();
    // stable sort keeps catalog order within one unlock level
    items.sort_by_key(|item| item.unlock_level);
    items
}

/// The next still-locked cosmetic relative to the given level.
pub fn next_unlock(level: u32) -> Option<&'static Cosmetic> {
    catalog::next_unlock(level)
}

/// Payload handed to the presentation layer when a completed note levels
/// the user up. Exactly one report is produced per completed note, even
/// when the award crossed several boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelUpReport {
    pub old_level: u32,
    pub new_level: u32,
    pub levels_gained: u32,
    /// XP awarded by the note that triggered the transition.
    pub xp_gained: u32,
    pub newly_unlocked: Vec<&'static Cosmetic>,
    pub next_unlock: Option<&'static Cosmetic>,
}

impl LevelUpReport {
    /// Resolves the full report for one `(old_level, new_level)` transition.
    pub fn for_transition(old_level: u32, new_level: u32, xp_gained: u32) -> Self {
        Self {
            old_level,
            new_level,
            levels_gained: new_level - old_level,
            xp_gained,
            newly_unlocked: newly_unlocked(old_level, new_level),
            next_unlock: next_unlock(new_level),
        }
    }
}
