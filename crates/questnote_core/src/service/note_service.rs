//! Note use-case service.
//!
//! # Responsibility
//! - Provide create/complete/delete/list entry points for core callers.
//! - Run the progression engine against the stored snapshot on completion.
//!
//! # Invariants
//! - Title validation runs before the XP calculator; no note is created on
//!   failure.
//! - Completing a note is the only event that invokes the level engine,
//!   and it fires at most once per note id.
//! - Deleting a note never revokes previously granted XP.

use crate::model::note::{Note, NoteId, NoteValidationError};
use crate::model::progress::UserProgress;
use crate::progression::level::{apply_gain, ProgressionError};
use crate::progression::unlocks::LevelUpReport;
use crate::progression::xp::compute_reward;
use crate::repo::note_repo::{NoteListQuery, NoteRepository, RepoError, RepoResult};
use log::{info, warn};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Rejected input on the note creation path.
    Validation(NoteValidationError),
    /// Progression contract violation (never user-facing).
    Progression(ProgressionError),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Progression(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent note state: {details}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Progression(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::InconsistentState(_) => None,
        }
    }
}

impl From<NoteValidationError> for NoteServiceError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<ProgressionError> for NoteServiceError {
    fn from(value: ProgressionError) -> Self {
        Self::Progression(value)
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Everything a caller needs to render one successful completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionReport {
    /// The note in its completed state.
    pub note: Note,
    /// XP awarded by this completion.
    pub xp_gained: u32,
    /// Snapshot after the award.
    pub progress: UserProgress,
    /// Present when the award crossed at least one level boundary.
    pub level_up: Option<LevelUpReport>,
}

/// Result of a completion request.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionOutcome {
    Completed(CompletionReport),
    /// The note was already completed; the level engine did not run.
    AlreadyCompleted,
    /// No note with the given id exists; callers decide whether to surface
    /// this to the user.
    NotFound,
}

/// Aggregate figures for the stats screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NoteStats {
    pub total_notes: u64,
    pub completed_notes: u64,
    pub pending_notes: u64,
    /// Lifetime XP from the progress snapshot.
    pub total_xp_earned: u64,
    /// Rounded average over completed notes; zero when nothing is completed.
    pub average_xp_per_note: u64,
}

/// Note service facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one pending note from raw title/content input.
    ///
    /// Inputs are trimmed; an empty trimmed title fails validation before
    /// the XP calculator runs. The reward is fixed here and never
    /// recalculated.
    pub fn create_note(
        &self,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Note, NoteServiceError> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err(NoteValidationError::EmptyTitle.into());
        }
        let content = content.into().trim().to_string();

        let xp_reward = compute_reward(&title, &content);
        let note = Note::new(title, content, xp_reward);
        let id = self.repo.create_note(&note)?;

        info!("event=note_created module=service status=ok note_id={id} xp_reward={xp_reward}");

        self.repo
            .get_note(id)?
            .ok_or(NoteServiceError::InconsistentState(
                "created note not found in read-back",
            ))
    }

    /// Completes one note and applies its XP reward to the snapshot.
    ///
    /// Unknown ids and already-completed notes are quiet no-ops; the level
    /// engine runs only for the single pending-to-completed transition.
    pub fn complete_note(&mut self, id: NoteId) -> Result<CompletionOutcome, NoteServiceError> {
        let Some(note) = self.repo.get_note(id)? else {
            warn!("event=note_completed module=service status=not_found note_id={id}");
            return Ok(CompletionOutcome::NotFound);
        };
        if note.is_completed {
            info!("event=note_completed module=service status=already_completed note_id={id}");
            return Ok(CompletionOutcome::AlreadyCompleted);
        }

        let before = self.repo.load_progress()?;
        let outcome = apply_gain(&before, i64::from(note.xp_reward))?;

        if !self.repo.complete_note(id, &outcome.progress)? {
            // a concurrent writer claimed the pending row first
            info!("event=note_completed module=service status=already_completed note_id={id}");
            return Ok(CompletionOutcome::AlreadyCompleted);
        }

        info!(
            "event=note_completed module=service status=ok note_id={id} xp_gained={} level={} xp={} total_xp={}",
            note.xp_reward, outcome.progress.level, outcome.progress.xp, outcome.progress.total_xp
        );

        let level_up = if outcome.leveled_up {
            let report =
                LevelUpReport::for_transition(before.level, outcome.progress.level, note.xp_reward);
            info!(
                "event=level_up module=service status=ok old_level={} new_level={} unlocked={}",
                report.old_level,
                report.new_level,
                report.newly_unlocked.len()
            );
            Some(report)
        } else {
            None
        };

        let completed = self
            .repo
            .get_note(id)?
            .ok_or(NoteServiceError::InconsistentState(
                "completed note not found in read-back",
            ))?;

        Ok(CompletionOutcome::Completed(CompletionReport {
            xp_gained: completed.xp_reward,
            note: completed,
            progress: outcome.progress,
            level_up,
        }))
    }

    /// Deletes one note. Previously granted XP is kept; `totalXp` and level
    /// never decrease.
    pub fn delete_note(&self, id: NoteId) -> Result<bool, NoteServiceError> {
        let deleted = self.repo.delete_note(id)?;
        if deleted {
            info!("event=note_deleted module=service status=ok note_id={id}");
        } else {
            warn!("event=note_deleted module=service status=not_found note_id={id}");
        }
        Ok(deleted)
    }

    /// Gets one note by stable ID.
    pub fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        self.repo.get_note(id)
    }

    /// Lists notes using filter and pagination options.
    pub fn list_notes(&self, query: &NoteListQuery) -> RepoResult<Vec<Note>> {
        self.repo.list_notes(query)
    }

    /// Current progress snapshot.
    pub fn progress(&self) -> RepoResult<UserProgress> {
        self.repo.load_progress()
    }

    /// Aggregate stats over all notes and the progress snapshot.
    pub fn stats(&self) -> Result<NoteStats, NoteServiceError> {
        let counts = self.repo.count_notes()?;
        let progress = self.repo.load_progress()?;

        let average_xp_per_note = if counts.completed > 0 {
            (progress.total_xp as f64 / counts.completed as f64).round() as u64
        } else {
            0
        };

        Ok(NoteStats {
            total_notes: counts.total,
            completed_notes: counts.completed,
            pending_notes: counts.total - counts.completed,
            total_xp_earned: progress.total_xp,
            average_xp_per_note,
        })
    }
}
