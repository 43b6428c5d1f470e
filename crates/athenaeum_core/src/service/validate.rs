//! Uniqueness validation over the record store.
//!
//! # Invariants
//! - Exactly one store round trip per call.
//! - Never writes to the store.
//! - Check-then-insert is not atomic; storage unique indexes catch the race.

use crate::model::kind::{Field, ResourceKind};
use crate::repo::record_store::RecordStore;
use crate::service::error::{FieldError, ServiceError};
use log::debug;

/// Fails with `FieldError::Conflict` when a `kind` record already has
/// `field == value`.
///
/// `value` must already be checked as non-empty by the caller.
pub fn assert_unique<S: RecordStore + ?Sized>(
    store: &S,
    kind: ResourceKind,
    field: Field,
    value: &str,
) -> Result<(), ServiceError> {
    match store.find_one(kind, field, value)? {
        Some(existing) => {
            debug!(
                "event=unique_check module=service status=conflict kind={} field={} existing_id={}",
                kind, field, existing.id
            );
            Err(FieldError::Conflict {
                field,
                value: value.to_string(),
            }
            .into())
        }
        None => Ok(()),
    }
}
