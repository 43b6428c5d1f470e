//! Domain model for goals, courses and athenaeums.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Define caller input shapes for create use-cases.
//!
//! # Invariants
//! - Every record is identified by a store-assigned `RecordId`.
//! - References between kinds are weak: a record stores identifiers only.

pub mod kind;
pub mod resource;
