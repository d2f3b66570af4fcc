//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate normalizer, mapper and repository calls into use cases.
//! - Keep request boundaries decoupled from storage details.
//!
//! # Invariants
//! - Services receive their storage collaborator explicitly; nothing here
//!   reaches for a global connection.

pub mod event_query_service;
pub mod project_service;
pub mod task_service;
