use questnote_core::db::migrations::latest_version;
use questnote_core::db::open_db_in_memory;
use questnote_core::{
    compute_reward, NoteListQuery, NoteRepository, NoteService, NoteServiceError,
    NoteValidationError, RepoError, SqliteNoteRepository, BASE_REWARD,
};
use rusqlite::{params, Connection};

#[test]
fn create_and_get_roundtrip() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let service = NoteService::new(repo);

    let created = service
        .create_note("  Weekly review  ", "  clear the inbox  ")
        .unwrap();
    assert_eq!(created.title, "Weekly review");
    assert_eq!(created.content, "clear the inbox");
    assert!(!created.is_completed);
    assert!(created.created_at > 0);
    assert_eq!(
        created.xp_reward,
        compute_reward("Weekly review", "clear the inbox")
    );

    let fetched = service.get_note(created.uuid).unwrap().unwrap();
    assert_eq!(fetched, created);
}

#[test]
fn create_rejects_blank_title_before_persisting() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let service = NoteService::new(repo);

    let err = service.create_note("   ", "body").unwrap_err();
    assert!(matches!(
        err,
        NoteServiceError::Validation(NoteValidationError::EmptyTitle)
    ));

    let listed = service.list_notes(&NoteListQuery::default()).unwrap();
    assert!(listed.is_empty());
}

#[test]
fn minimal_note_gets_base_reward() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let service = NoteService::new(repo);

    let created = service.create_note("a", "").unwrap();
    assert_eq!(created.xp_reward, BASE_REWARD);
}

#[test]
fn list_orders_pending_first_then_newest() {
    let mut conn = open_db_in_memory().unwrap();

    let (old_pending, new_pending, completed) = {
        let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
        let mut service = NoteService::new(repo);
        let old_pending = service.create_note("old pending", "").unwrap();
        let new_pending = service.create_note("new pending", "").unwrap();
        let completed = service.create_note("completed", "").unwrap();
        service.complete_note(completed.uuid).unwrap();
        (old_pending.uuid, new_pending.uuid, completed.uuid)
    };

    conn.execute(
        "UPDATE notes SET created_at = 1000 WHERE uuid = ?1;",
        params![old_pending.to_string()],
    )
    .unwrap();
    conn.execute(
        "UPDATE notes SET created_at = 2000 WHERE uuid = ?1;",
        params![new_pending.to_string()],
    )
    .unwrap();
    conn.execute(
        "UPDATE notes SET created_at = 3000 WHERE uuid = ?1;",
        params![completed.to_string()],
    )
    .unwrap();

    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let service = NoteService::new(repo);
    let listed = service.list_notes(&NoteListQuery::default()).unwrap();
    let ids: Vec<_> = listed.iter().map(|note| note.uuid).collect();
    assert_eq!(ids, vec![new_pending, old_pending, completed]);
}

#[test]
fn list_supports_pending_only_filter() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let mut service = NoteService::new(repo);

    let pending = service.create_note("stays pending", "").unwrap();
    let done = service.create_note("gets done", "").unwrap();
    service.complete_note(done.uuid).unwrap();

    let query = NoteListQuery {
        pending_only: true,
        ..NoteListQuery::default()
    };
    let listed = service.list_notes(&query).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].uuid, pending.uuid);
}

#[test]
fn list_limit_defaults_to_10_and_caps_at_50() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let service = NoteService::new(repo);

    for idx in 0..60 {
        service.create_note(format!("note {idx}"), "").unwrap();
    }

    let defaulted = service.list_notes(&NoteListQuery::default()).unwrap();
    assert_eq!(defaulted.len(), 10);

    let capped = service
        .list_notes(&NoteListQuery {
            limit: Some(500),
            ..NoteListQuery::default()
        })
        .unwrap();
    assert_eq!(capped.len(), 50);
}

#[test]
fn list_pagination_with_offset_is_stable() {
    let mut conn = open_db_in_memory().unwrap();

    let ids = {
        let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
        let service = NoteService::new(repo);
        (0..3)
            .map(|idx| service.create_note(format!("note {idx}"), "").unwrap().uuid)
            .collect::<Vec<_>>()
    };

    // pin identical timestamps so ordering falls back to uuid
    conn.execute("UPDATE notes SET created_at = 1234567890000;", [])
        .unwrap();
    let mut sorted = ids.clone();
    sorted.sort_by_key(|id| id.to_string());

    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let service = NoteService::new(repo);
    let page = service
        .list_notes(&NoteListQuery {
            limit: Some(2),
            offset: 1,
            ..NoteListQuery::default()
        })
        .unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].uuid, sorted[1]);
    assert_eq!(page[1].uuid, sorted[2]);
}

#[test]
fn delete_removes_row_and_reports_unknown_ids() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let service = NoteService::new(repo);

    let created = service.create_note("temporary", "").unwrap();
    assert!(service.delete_note(created.uuid).unwrap());
    assert!(service.get_note(created.uuid).unwrap().is_none());

    assert!(!service.delete_note(created.uuid).unwrap());
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let mut conn = Connection::open_in_memory().unwrap();

    let result = SqliteNoteRepository::try_new(&mut conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_required_tables() {
    let mut conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteNoteRepository::try_new(&mut conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("notes"))
    ));
}

#[test]
fn repository_rejects_connection_missing_required_note_column() {
    let mut conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE notes (
            uuid TEXT PRIMARY KEY NOT NULL,
            title TEXT NOT NULL,
            content TEXT NOT NULL DEFAULT '',
            created_at INTEGER NOT NULL DEFAULT 0,
            is_completed INTEGER NOT NULL DEFAULT 0
        );
        CREATE TABLE progress (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            level INTEGER NOT NULL DEFAULT 1,
            xp INTEGER NOT NULL DEFAULT 0,
            total_xp INTEGER NOT NULL DEFAULT 0
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteNoteRepository::try_new(&mut conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "notes",
            column: "xp_reward"
        })
    ));
}

#[test]
fn corrupt_persisted_reward_is_rejected_on_read() {
    let mut conn = open_db_in_memory().unwrap();

    let id = {
        let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
        let service = NoteService::new(repo);
        service.create_note("valid note", "").unwrap().uuid
    };

    conn.execute(
        "UPDATE notes SET xp_reward = 3 WHERE uuid = ?1;",
        params![id.to_string()],
    )
    .unwrap();

    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let err = repo.get_note(id).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}
