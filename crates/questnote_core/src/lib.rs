//! Core domain logic for QuestNote.
//! This crate is the single source of truth for progression invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod progression;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{Note, NoteId, NoteValidationError};
pub use model::progress::{ProgressValidationError, UserProgress};
pub use progression::catalog::{Cosmetic, CosmeticCategory};
pub use progression::level::{apply_gain, xp_threshold, GainOutcome, ProgressionError};
pub use progression::unlocks::{newly_unlocked, next_unlock, LevelUpReport};
pub use progression::xp::{compute_reward, BASE_REWARD};
pub use repo::note_repo::{
    NoteCounts, NoteListQuery, NoteRepository, RepoError, RepoResult, SqliteNoteRepository,
};
pub use service::note_service::{
    CompletionOutcome, CompletionReport, NoteService, NoteServiceError, NoteStats,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
