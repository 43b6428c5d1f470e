//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the record store capability consumed by services.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository APIs distinguish semantic storage conflicts
//!   (`UniqueViolation`) from transport errors.

pub mod record_store;
