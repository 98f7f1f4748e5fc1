//! XP reward calculation for new notes.
//!
//! # Responsibility
//! - Assign a reproducible XP reward from note text at creation time.
//!
//! # Invariants
//! - `compute_reward` never returns less than [`BASE_REWARD`].
//! - The reward is a function of the two trimmed strings only.

/// Minimum XP granted for completing any note.
pub const BASE_REWARD: u32 = 15;

const TITLE_CHARS_PER_XP: usize = 2;
const CONTENT_CHARS_PER_XP: usize = 5;

/// Computes the XP reward for a note from its title and content.
///
/// `reward = BASE_REWARD + trimmed_title_len / 2 + trimmed_content_len / 5`,
/// floored at [`BASE_REWARD`]. Lengths count Unicode scalar values.
///
/// Does not validate that the title is non-empty; that precondition belongs
/// to the note creation path.
pub fn compute_reward(title: &str, content: &str) -> u32 {
    let title_bonus = (title.trim().chars().count() / TITLE_CHARS_PER_XP) as u32;
    let content_bonus = (content.trim().chars().count() / CONTENT_CHARS_PER_XP) as u32;
    (BASE_REWARD + title_bonus + content_bonus).max(BASE_REWARD)
}
