//! Goal/course/athenaeum use-case service.
//!
//! # Responsibility
//! - Validate create input, resolve name references, persist records.
//! - Provide detail and list reads for every resource kind.
//!
//! # Invariants
//! - Create steps run in a fixed order: required name, uniqueness (kinds
//!   with unique names only), reference resolution, insert.
//! - A failed validation step stops the pipeline; nothing is persisted.
//! - Service layer holds no state besides the injected store.

use crate::model::kind::{Field, RecordId, ResourceKind};
use crate::model::resource::{Athenaeum, AthenaeumInput, Course, CourseInput, Goal, GoalInput};
use crate::repo::record_store::{NewRecord, Record, RecordStore, RepoError};
use crate::service::error::{FieldError, ServiceError};
use crate::service::resolve::resolve_references;
use crate::service::validate::assert_unique;
use log::{info, warn};
use std::collections::BTreeSet;
use std::time::Instant;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Resource service facade over a record store.
pub struct ResourceService<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> ResourceService<S> {
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrows the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates one athenaeum from a name and a list of course names.
    ///
    /// # Contract
    /// - Empty `name` fails with `FieldError::Required`; the store is not
    ///   consulted.
    /// - Existing `name` fails with `FieldError::Conflict`.
    /// - Unknown course names are dropped; duplicates collapse.
    /// - Insert failures, including a lost uniqueness race, are returned as
    ///   `ServiceError::Repo`.
    pub fn create_athenaeum(&self, input: &AthenaeumInput) -> ServiceResult<Athenaeum> {
        let record = self.create(ResourceKind::Athenaeum, &input.name, &input.courses)?;
        athenaeum_from_record(record)
    }

    /// Creates one course, resolving goal names leniently.
    ///
    /// Course names are not checked for uniqueness.
    pub fn create_course(&self, input: &CourseInput) -> ServiceResult<Course> {
        let record = self.create(ResourceKind::Course, &input.name, &input.goals)?;
        course_from_record(record)
    }

    /// Creates one goal with a unique name.
    pub fn create_goal(&self, input: &GoalInput) -> ServiceResult<Goal> {
        let record = self.create(ResourceKind::Goal, &input.name, &[])?;
        goal_from_record(record)
    }

    pub fn get_athenaeum(&self, id: RecordId) -> ServiceResult<Option<Athenaeum>> {
        self.get(ResourceKind::Athenaeum, id)?
            .map(athenaeum_from_record)
            .transpose()
    }

    pub fn get_course(&self, id: RecordId) -> ServiceResult<Option<Course>> {
        self.get(ResourceKind::Course, id)?
            .map(course_from_record)
            .transpose()
    }

    pub fn get_goal(&self, id: RecordId) -> ServiceResult<Option<Goal>> {
        self.get(ResourceKind::Goal, id)?
            .map(goal_from_record)
            .transpose()
    }

    pub fn list_athenaeums(&self) -> ServiceResult<Vec<Athenaeum>> {
        self.store
            .list(ResourceKind::Athenaeum)?
            .into_iter()
            .map(athenaeum_from_record)
            .collect()
    }

    pub fn list_courses(&self) -> ServiceResult<Vec<Course>> {
        self.store
            .list(ResourceKind::Course)?
            .into_iter()
            .map(course_from_record)
            .collect()
    }

    pub fn list_goals(&self) -> ServiceResult<Vec<Goal>> {
        self.store
            .list(ResourceKind::Goal)?
            .into_iter()
            .map(goal_from_record)
            .collect()
    }

    fn create(
        &self,
        kind: ResourceKind,
        name: &str,
        reference_names: &[String],
    ) -> ServiceResult<Record> {
        let started_at = Instant::now();
        let event = create_event(kind);

        if name.is_empty() {
            info!("event={event} module=service status=rejected reason=name_required");
            return Err(FieldError::Required {
                kind,
                field: Field::Name,
            }
            .into());
        }

        if kind.has_unique_name() {
            if let Err(err) = assert_unique(&self.store, kind, Field::Name, name) {
                log_failure(event, &err);
                return Err(err);
            }
        }

        let refs = match kind.referenced_kind() {
            Some(target) => resolve_references(&self.store, target, reference_names)
                .map_err(|err| {
                    let err = ServiceError::from(err);
                    log_failure(event, &err);
                    err
                })?,
            None => Vec::new(),
        };
        let dropped = distinct_count(reference_names).saturating_sub(refs.len());

        let new_record = NewRecord {
            name: name.to_string(),
            refs,
        };
        let record = self.store.insert(kind, &new_record).map_err(|err| {
            let err = ServiceError::from(err);
            log_failure(event, &err);
            err
        })?;

        info!(
            "event={} module=service status=ok id={} refs={} unresolved_refs={} duration_ms={}",
            event,
            record.id,
            new_record.refs.len(),
            dropped,
            started_at.elapsed().as_millis()
        );
        Ok(record)
    }

    fn get(&self, kind: ResourceKind, id: RecordId) -> ServiceResult<Option<Record>> {
        Ok(self.store.find_one(kind, Field::Id, &id.to_string())?)
    }
}

fn create_event(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Goal => "goal_create",
        ResourceKind::Course => "course_create",
        ResourceKind::Athenaeum => "athenaeum_create",
    }
}

fn log_failure(event: &str, err: &ServiceError) {
    match err {
        ServiceError::Invalid(errors) => {
            for error in errors {
                info!(
                    "event={} module=service status=rejected field={} reason={}",
                    event,
                    error.field(),
                    match error {
                        FieldError::Required { .. } => "required",
                        FieldError::Conflict { .. } => "conflict",
                    }
                );
            }
        }
        ServiceError::Repo(RepoError::UniqueViolation { kind, field, .. }) => {
            warn!(
                "event={} module=service status=error error_code=unique_race kind={} field={}",
                event, kind, field
            );
        }
        ServiceError::Repo(repo_err) => {
            warn!(
                "event={} module=service status=error error_code=storage_failed error={}",
                event, repo_err
            );
        }
    }
}

fn distinct_count(names: &[String]) -> usize {
    names.iter().collect::<BTreeSet<_>>().len()
}

fn required_name(record: &mut Record) -> Result<String, RepoError> {
    record.name.take().ok_or_else(|| {
        RepoError::InvalidData(format!(
            "{} record {} loaded without name",
            record.kind, record.id
        ))
    })
}

fn athenaeum_from_record(mut record: Record) -> ServiceResult<Athenaeum> {
    let name = required_name(&mut record)?;
    Ok(Athenaeum {
        id: record.id,
        name,
        courses: record.refs.unwrap_or_default(),
    })
}

fn course_from_record(mut record: Record) -> ServiceResult<Course> {
    let name = required_name(&mut record)?;
    Ok(Course {
        id: record.id,
        name,
        goals: record.refs.unwrap_or_default(),
    })
}

fn goal_from_record(mut record: Record) -> ServiceResult<Goal> {
    let name = required_name(&mut record)?;
    Ok(Goal {
        id: record.id,
        name,
    })
}
