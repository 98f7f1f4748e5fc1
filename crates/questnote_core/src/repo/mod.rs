//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the note-store contract consumed by the service layer.
//! - Isolate SQLite query details from business orchestration.
//!
//! # Invariants
//! - Repository writes must validate domain state before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod note_repo;
