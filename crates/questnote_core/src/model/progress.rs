//! User progress snapshot.
//!
//! # Responsibility
//! - Hold the single progression record: level, in-level XP, lifetime XP.
//!
//! # Invariants
//! - `level >= 1` and is monotonically non-decreasing.
//! - `xp < xp_threshold(level)` after every update.
//! - `total_xp` is a lifetime sum and is never reset.

use crate::progression::level::xp_threshold;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Progression snapshot owned by the note store and threaded through the
/// level engine by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProgress {
    /// Current level, starting at 1.
    pub level: u32,
    /// XP accumulated within the current level.
    pub xp: u32,
    /// Lifetime XP ever awarded; never decremented.
    pub total_xp: u64,
}

/// Validation failure for a persisted progress snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressValidationError {
    /// Levels start at 1; zero indicates corrupt storage.
    LevelBelowOne,
    /// In-level XP must stay strictly below the active threshold.
    XpAtOrAboveThreshold { level: u32, xp: u32 },
    /// Lifetime XP can never be smaller than the in-level remainder.
    TotalBelowCurrent { total_xp: u64, xp: u32 },
}

impl Display for ProgressValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LevelBelowOne => write!(f, "progress level must be at least 1"),
            Self::XpAtOrAboveThreshold { level, xp } => write!(
                f,
                "in-level xp {xp} breaches the threshold {} of level {level}",
                xp_threshold(*level)
            ),
            Self::TotalBelowCurrent { total_xp, xp } => {
                write!(f, "total xp {total_xp} is below in-level xp {xp}")
            }
        }
    }
}

impl Error for ProgressValidationError {}

impl UserProgress {
    /// Fresh snapshot for a new user: level 1, no XP.
    pub fn new() -> Self {
        Self {
            level: 1,
            xp: 0,
            total_xp: 0,
        }
    }

    /// Checks the snapshot invariants.
    pub fn validate(&self) -> Result<(), ProgressValidationError> {
        if self.level == 0 {
            return Err(ProgressValidationError::LevelBelowOne);
        }
        if self.xp >= xp_threshold(self.level) {
            return Err(ProgressValidationError::XpAtOrAboveThreshold {
                level: self.level,
                xp: self.xp,
            });
        }
        if self.total_xp < u64::from(self.xp) {
            return Err(ProgressValidationError::TotalBelowCurrent {
                total_xp: self.total_xp,
                xp: self.xp,
            });
        }
        Ok(())
    }
}

impl Default for UserProgress {
    fn default() -> Self {
        Self::new()
    }
}
