//! Lenient name-to-identifier reference resolution.
//!
//! # Invariants
//! - Exactly one store round trip per call, projected to identifiers, for
//!   any number of names.
//! - Unknown names are dropped without error.
//! - Each matched record contributes at most one identifier.
//! - Output order is unspecified.

use crate::model::kind::{Field, RecordId, ResourceKind};
use crate::repo::record_store::{Projection, RecordStore, RepoResult};
use log::debug;

/// Resolves `names` of `kind` records into their stored identifiers.
///
/// Only storage failures are returned as errors.
pub fn resolve_references<S: RecordStore + ?Sized>(
    store: &S,
    kind: ResourceKind,
    names: &[String],
) -> RepoResult<Vec<RecordId>> {
    let records = store.find_many(kind, Field::Name, names, Projection::IdOnly)?;
    let mut ids: Vec<RecordId> = Vec::with_capacity(records.len());
    for record in records {
        if !ids.contains(&record.id) {
            ids.push(record.id);
        }
    }

    debug!(
        "event=reference_resolve module=service status=ok kind={} requested={} resolved={}",
        kind,
        names.len(),
        ids.len()
    );
    Ok(ids)
}
