//! Level transition rules.
//!
//! # Responsibility
//! - Convert (progress snapshot, XP gained) into a new snapshot.
//! - Report whether and how many level boundaries were crossed.
//!
//! # Invariants
//! - On return, `xp < xp_threshold(level)` and `xp >= 0` always hold.
//! - `total_xp` grows by exactly the gained amount; it is never reset.
//! - A negative gain is rejected without touching state.

use crate::model::progress::UserProgress;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// XP required to finish the given level and reach the next one.
pub fn xp_threshold(level: u32) -> u32 {
    level * 100
}

/// Result of applying one XP gain to a progress snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GainOutcome {
    /// Snapshot after the gain, with the in-level invariant restored.
    pub progress: UserProgress,
    /// True when at least one level boundary was crossed.
    pub leveled_up: bool,
    /// Number of levels gained by this single award.
    pub levels_gained: u32,
}

/// Contract violation reported by the level engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressionError {
    /// XP awards are never negative in this domain; there is no undo.
    NegativeGain(i64),
}

impl Display for ProgressionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NegativeGain(gained) => {
                write!(f, "xp gain must be non-negative, got {gained}")
            }
        }
    }
}

impl Error for ProgressionError {}

/// Applies an XP gain to a progress snapshot.
///
/// A single large award may cross several level boundaries at once; the
/// threshold subtraction loops until the in-level invariant holds again.
///
/// # Errors
/// - [`ProgressionError::NegativeGain`] when `gained < 0`.
pub fn apply_gain(progress: &UserProgress, gained: i64) -> Result<GainOutcome, ProgressionError> {
    if gained < 0 {
        return Err(ProgressionError::NegativeGain(gained));
    }
    let gained = gained as u64;

    let total_xp = progress.total_xp + gained;
    let mut level = progress.level;
    let mut xp = u64::from(progress.xp) + gained;
    let mut levels_gained = 0u32;

    while xp >= u64::from(xp_threshold(level)) {
        xp -= u64::from(xp_threshold(level));
        level += 1;
        levels_gained += 1;
    }

    Ok(GainOutcome {
        progress: UserProgress {
            level,
            // loop exit guarantees xp < xp_threshold(level) <= u32::MAX
            xp: xp as u32,
            total_xp,
        },
        leveled_up: levels_gained > 0,
        levels_gained,
    })
}

#[cfg(test)]
mod tests {
    use super::{apply_gain, xp_threshold, ProgressionError};
    use crate::model::progress::UserProgress;

    #[test]
    fn threshold_grows_linearly() {
        assert_eq!(xp_threshold(1), 100);
        assert_eq!(xp_threshold(2), 200);
        assert_eq!(xp_threshold(7), 700);
    }

    #[test]
    fn gain_below_threshold_keeps_level() {
        let progress = UserProgress {
            level: 2,
            xp: 50,
            total_xp: 50,
        };
        let outcome = apply_gain(&progress, 30).unwrap();
        assert_eq!(outcome.progress.level, 2);
        assert_eq!(outcome.progress.xp, 80);
        assert_eq!(outcome.progress.total_xp, 80);
        assert!(!outcome.leveled_up);
        assert_eq!(outcome.levels_gained, 0);
    }

    #[test]
    fn gain_at_exact_threshold_levels_up_to_zero_xp() {
        let progress = UserProgress::new();
        let outcome = apply_gain(&progress, 100).unwrap();
        assert_eq!(outcome.progress.level, 2);
        assert_eq!(outcome.progress.xp, 0);
        assert!(outcome.leveled_up);
        assert_eq!(outcome.levels_gained, 1);
    }

    #[test]
    fn single_award_crosses_multiple_boundaries() {
        let progress = UserProgress::new();
        let outcome = apply_gain(&progress, 250).unwrap();
        assert_eq!(outcome.progress.level, 3);
        assert_eq!(outcome.progress.xp, 50);
        assert_eq!(outcome.progress.total_xp, 250);
        assert!(outcome.leveled_up);
        assert_eq!(outcome.levels_gained, 2);
    }

    #[test]
    fn invariant_restored_for_varied_gains() {
        let mut progress = UserProgress::new();
        for gained in [0, 15, 99, 100, 101, 250, 1_000, 12_345] {
            let outcome = apply_gain(&progress, gained).unwrap();
            assert!(outcome.progress.xp < xp_threshold(outcome.progress.level));
            assert_eq!(
                outcome.progress.total_xp,
                progress.total_xp + gained as u64
            );
            progress = outcome.progress;
        }
    }

    #[test]
    fn zero_gain_is_a_no_op_without_level_up() {
        let progress = UserProgress {
            level: 3,
            xp: 10,
            total_xp: 610,
        };
        let outcome = apply_gain(&progress, 0).unwrap();
        assert_eq!(outcome.progress, progress);
        assert!(!outcome.leveled_up);
    }

    #[test]
    fn negative_gain_is_rejected() {
        let progress = UserProgress::new();
        let err = apply_gain(&progress, -1).unwrap_err();
        assert_eq!(err, ProgressionError::NegativeGain(-1));
    }
}
