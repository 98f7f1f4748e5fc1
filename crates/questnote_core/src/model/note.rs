//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical note record with its fixed XP reward.
//! - Provide write/read-path validation.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another note.
//! - `xp_reward` is computed once at creation and never recalculated;
//!   it is always at least the base reward.
//! - `is_completed` transitions `false -> true` exactly once.

use crate::progression::xp::BASE_REWARD;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for every note.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type NoteId = Uuid;

/// Validation failure for note state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteValidationError {
    /// Title is empty after trimming.
    EmptyTitle,
    /// Stored reward is below the guaranteed minimum.
    RewardBelowMinimum(u32),
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "note title must not be empty"),
            Self::RewardBelowMinimum(reward) => {
                write!(f, "xp reward {reward} is below the minimum of {BASE_REWARD}")
            }
        }
    }
}

impl Error for NoteValidationError {}

/// Canonical note record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Stable global ID used for completion, deletion and auditing.
    pub uuid: NoteId,
    /// Non-empty after trimming; stored trimmed.
    pub title: String,
    /// Optional body text; stored trimmed, may be empty.
    pub content: String,
    /// Epoch milliseconds assigned by storage at insert; zero until the
    /// note is persisted.
    pub created_at: i64,
    /// Completion state; never transitions back to pending.
    pub is_completed: bool,
    /// XP granted when the note is completed. Fixed at creation.
    pub xp_reward: u32,
}

impl Note {
    /// Creates a pending note with a generated stable ID.
    pub fn new(title: impl Into<String>, content: impl Into<String>, xp_reward: u32) -> Self {
        Self::with_id(Uuid::new_v4(), title, content, xp_reward)
    }

    /// Creates a pending note with a caller-provided stable ID.
    ///
    /// Used by tests and import paths where identity already exists.
    pub fn with_id(
        uuid: NoteId,
        title: impl Into<String>,
        content: impl Into<String>,
        xp_reward: u32,
    ) -> Self {
        Self {
            uuid,
            title: title.into(),
            content: content.into(),
            created_at: 0,
            is_completed: false,
            xp_reward,
        }
    }

    /// Checks the note invariants.
    ///
    /// Called before every write and after every read so corrupt persisted
    /// state is rejected instead of masked.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.title.trim().is_empty() {
            return Err(NoteValidationError::EmptyTitle);
        }
        if self.xp_reward < BASE_REWARD {
            return Err(NoteValidationError::RewardBelowMinimum(self.xp_reward));
        }
        Ok(())
    }
}
