//! Pure progression engine: XP rewards, level transitions, cosmetic unlocks.
//!
//! # Responsibility
//! - Compute deterministic XP rewards for new notes.
//! - Apply XP gains to progress snapshots and detect level-ups.
//! - Resolve which cosmetics a level (transition) unlocks.
//!
//! # Invariants
//! - Every function here is pure: no I/O, no clocks, no shared state.
//! - Callers own the progress snapshot; functions return new values.

pub mod catalog;
pub mod level;
pub mod unlocks;
pub mod xp;
