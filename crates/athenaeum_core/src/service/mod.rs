//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate record store calls into create/read use-cases.
//! - Keep callers decoupled from storage details.

pub mod error;
pub mod resolve;
pub mod resource_service;
pub mod validate;
