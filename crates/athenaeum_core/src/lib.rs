//! Core domain logic for Athenaeum resources.
//! This crate is the single source of truth for reference-integrity rules.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::kind::{Field, RecordId, ResourceKind};
pub use model::resource::{Athenaeum, AthenaeumInput, Course, CourseInput, Goal, GoalInput};
pub use repo::record_store::{
    NewRecord, Projection, Record, RecordStore, RepoError, RepoResult, SqliteRecordStore,
};
pub use service::error::{FieldError, FieldErrorView, ServiceError};
pub use service::resolve::resolve_references;
pub use service::resource_service::{ResourceService, ServiceResult};
pub use service::validate::assert_unique;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
