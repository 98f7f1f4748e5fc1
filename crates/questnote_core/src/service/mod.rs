//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate the progression engine and the note store into use-case
//!   level APIs.
//! - Keep embedding layers decoupled from storage details.

pub mod note_service;
