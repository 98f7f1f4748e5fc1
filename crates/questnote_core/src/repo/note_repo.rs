//! Note store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist notes and the single user-progress snapshot.
//! - Own the transactional completion write with its at-most-once guard.
//!
//! # Invariants
//! - Write paths validate domain state before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Note listing is ordered pending-first, then newest-first.

use crate::db::{migrations, DbError};
use crate::model::note::{Note, NoteId, NoteValidationError};
use crate::model::progress::{ProgressValidationError, UserProgress};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const NOTE_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    content,
    created_at,
    is_completed,
    xp_reward
FROM notes";

const NOTES_DEFAULT_LIMIT: u32 = 10;
const NOTES_LIMIT_MAX: u32 = 50;

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for note persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(NoteValidationError),
    Progress(ProgressValidationError),
    Db(DbError),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Progress(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection not migrated: schema version {actual_version}, expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table missing: {table}"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column missing: {table}.{column}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Progress(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NoteValidationError> for RepoError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<ProgressValidationError> for RepoError {
    fn from(value: ProgressValidationError) -> Self {
        Self::Progress(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing notes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteListQuery {
    /// Restrict the result to notes that can still be completed.
    pub pending_only: bool,
    /// Maximum rows to return. Defaults to 10 and clamps to 50.
    pub limit: Option<u32>,
    /// Number of rows to skip.
    pub offset: u32,
}

/// Aggregate counts used by the stats projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteCounts {
    pub total: u64,
    pub completed: u64,
}

/// Repository interface for the note store.
pub trait NoteRepository {
    /// Persists one pending note and returns its stable id.
    fn create_note(&self, note: &Note) -> RepoResult<NoteId>;
    /// Gets one note by id.
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Lists notes ordered pending-first, newest-first.
    fn list_notes(&self, query: &NoteListQuery) -> RepoResult<Vec<Note>>;
    /// Hard-deletes one note. Returns `false` for an unknown id.
    fn delete_note(&self, id: NoteId) -> RepoResult<bool>;
    /// Aggregate note counts.
    fn count_notes(&self) -> RepoResult<NoteCounts>;
    /// Loads the progress snapshot; a fresh default when none is stored.
    fn load_progress(&self) -> RepoResult<UserProgress>;
    /// Stores the progress snapshot (single-row upsert).
    fn save_progress(&self, progress: &UserProgress) -> RepoResult<()>;
    /// Marks one note completed and stores the new snapshot in a single
    /// transaction. Returns `false` when no pending row matched the id,
    /// in which case progress is left untouched.
    fn complete_note(&mut self, id: NoteId, progress: &UserProgress) -> RepoResult<bool>;
}

/// SQLite-backed note store.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn create_note(&self, note: &Note) -> RepoResult<NoteId> {
        note.validate()?;

        // created_at is assigned by the storage default at insert
        self.conn.execute(
            "INSERT INTO notes (uuid, title, content, is_completed, xp_reward)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                note.uuid.to_string(),
                note.title.as_str(),
                note.content.as_str(),
                bool_to_int(note.is_completed),
                note.xp_reward,
            ],
        )?;

        Ok(note.uuid)
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(row)?));
        }

        Ok(None)
    }

    fn list_notes(&self, query: &NoteListQuery) -> RepoResult<Vec<Note>> {
        let mut sql = format!("{NOTE_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if query.pending_only {
            sql.push_str(" AND is_completed = 0");
        }

        sql.push_str(" ORDER BY is_completed ASC, created_at DESC, uuid ASC");

        let limit = normalize_note_limit(query.limit);
        sql.push_str(" LIMIT ?");
        bind_values.push(Value::Integer(i64::from(limit)));
        if query.offset > 0 {
            sql.push_str(" OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut notes = Vec::new();

        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }

        Ok(notes)
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE uuid = ?1;", [id.to_string()])?;
        Ok(changed > 0)
    }

    fn count_notes(&self) -> RepoResult<NoteCounts> {
        let (total, completed): (i64, i64) = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(is_completed), 0) FROM notes;",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        Ok(NoteCounts {
            total: non_negative_count(total, "notes count")?,
            completed: non_negative_count(completed, "completed count")?,
        })
    }

    fn load_progress(&self) -> RepoResult<UserProgress> {
        let mut stmt = self
            .conn
            .prepare("SELECT level, xp, total_xp FROM progress WHERE id = 1;")?;

        let mut rows = stmt.query([])?;
        if let Some(row) = rows.next()? {
            return parse_progress_row(row);
        }

        Ok(UserProgress::new())
    }

    fn save_progress(&self, progress: &UserProgress) -> RepoResult<()> {
        progress.validate()?;
        upsert_progress(self.conn, progress)
    }

    fn complete_note(&mut self, id: NoteId, progress: &UserProgress) -> RepoResult<bool> {
        progress.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        // The is_completed guard makes completion at-most-once: a raced
        // duplicate call matches zero rows and must not touch progress.
        let changed = tx.execute(
            "UPDATE notes SET is_completed = 1 WHERE uuid = ?1 AND is_completed = 0;",
            [id.to_string()],
        )?;
        if changed == 0 {
            return Ok(false);
        }

        upsert_progress(&tx, progress)?;
        tx.commit()?;
        Ok(true)
    }
}

/// Normalizes list limit according to the notes contract.
pub fn normalize_note_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) => NOTES_DEFAULT_LIMIT,
        Some(value) if value > NOTES_LIMIT_MAX => NOTES_LIMIT_MAX,
        Some(value) => value,
        None => NOTES_DEFAULT_LIMIT,
    }
}

fn upsert_progress(conn: &Connection, progress: &UserProgress) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO progress (id, level, xp, total_xp)
         VALUES (1, ?1, ?2, ?3)
         ON CONFLICT (id) DO UPDATE SET
            level = excluded.level,
            xp = excluded.xp,
            total_xp = excluded.total_xp;",
        params![progress.level, progress.xp, progress.total_xp as i64],
    )?;
    Ok(())
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in notes.uuid"))
    })?;

    let is_completed = match row.get::<_, i64>("is_completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_completed value `{other}` in notes.is_completed"
            )));
        }
    };

    let note = Note {
        uuid,
        title: row.get("title")?,
        content: row.get("content")?,
        created_at: row.get("created_at")?,
        is_completed,
        xp_reward: row.get("xp_reward")?,
    };
    note.validate()?;
    Ok(note)
}

fn parse_progress_row(row: &Row<'_>) -> RepoResult<UserProgress> {
    let total_xp_raw: i64 = row.get("total_xp")?;
    let total_xp = u64::try_from(total_xp_raw).map_err(|_| {
        RepoError::InvalidData(format!(
            "negative total_xp value `{total_xp_raw}` in progress.total_xp"
        ))
    })?;

    let progress = UserProgress {
        level: row.get("level")?,
        xp: row.get("xp")?,
        total_xp,
    };
    progress.validate()?;
    Ok(progress)
}

fn non_negative_count(value: i64, what: &str) -> RepoResult<u64> {
    u64::try_from(value)
        .map_err(|_| RepoError::InvalidData(format!("negative {what} `{value}`")))
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = migrations::latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in ["notes", "progress"] {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    for column in [
        "uuid",
        "title",
        "content",
        "created_at",
        "is_completed",
        "xp_reward",
    ] {
        if !table_has_column(conn, "notes", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "notes",
                column,
            });
        }
    }

    for column in ["id", "level", "xp", "total_xp"] {
        if !table_has_column(conn, "progress", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "progress",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
