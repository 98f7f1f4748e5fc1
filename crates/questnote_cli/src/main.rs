//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `questnote_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use questnote_core::db::open_db_in_memory;
use questnote_core::{next_unlock, CompletionOutcome, NoteService, SqliteNoteRepository};
use std::error::Error;

fn main() {
    if let Err(err) = run() {
        eprintln!("questnote error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    println!("questnote_core version={}", questnote_core::core_version());

    let mut conn = open_db_in_memory()?;
    let repo = SqliteNoteRepository::try_new(&mut conn)?;
    let mut service = NoteService::new(repo);

    let note = service.create_note("Try QuestNote", "complete this note to earn xp")?;
    println!(
        "created note `{}` worth {} xp",
        note.title, note.xp_reward
    );

    match service.complete_note(note.uuid)? {
        CompletionOutcome::Completed(report) => {
            println!(
                "completed for {} xp: level={} xp={} total_xp={}",
                report.xp_gained,
                report.progress.level,
                report.progress.xp,
                report.progress.total_xp
            );
            if let Some(next) = next_unlock(report.progress.level) {
                println!(
                    "next unlock: {} {} at level {}",
                    next.emoji, next.name, next.unlock_level
                );
            }
        }
        other => println!("unexpected completion outcome: {other:?}"),
    }

    Ok(())
}
