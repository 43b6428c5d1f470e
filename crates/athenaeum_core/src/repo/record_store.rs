//! Record store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide exact-match lookups, projected multi-value lookups and inserts
//!   over goal/course/athenaeum storage.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Lookups are exact-match only; no pattern, range or paging queries.
//! - `insert` writes a record and its reference rows in one transaction.
//! - Name collisions on index-backed kinds surface as
//!   `RepoError::UniqueViolation`, never as a generic SQLite error.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::kind::{Field, RecordId, ResourceKind};
use rusqlite::{params, Connection, ErrorCode};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence error for record store operations.
#[derive(Debug)]
pub enum RepoError {
    /// Transport or SQL failure.
    Db(DbError),
    /// Store-level unique index rejected the write.
    UniqueViolation {
        kind: ResourceKind,
        field: Field,
        value: String,
    },
    /// Connection schema is not at the version this binary expects.
    SchemaNotReady { db_version: u32, expected: u32 },
    /// Write input or persisted row is malformed.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UniqueViolation { kind, field, value } => write!(
                f,
                "unique constraint violated: {kind} with {field} `{value}` already stored"
            ),
            Self::SchemaNotReady {
                db_version,
                expected,
            } => write!(
                f,
                "database schema version {db_version} does not match expected {expected}"
            ),
            Self::InvalidData(message) => write!(f, "invalid record data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Column selection for multi-record lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Projection {
    /// Identifier, name and references.
    #[default]
    Full,
    /// Identifier only; `name` and `refs` are left `None`.
    IdOnly,
}

/// Stored record as returned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: RecordId,
    pub kind: ResourceKind,
    /// `None` when excluded by projection.
    pub name: Option<String>,
    /// Referenced ids in stored order. `None` when excluded by projection.
    pub refs: Option<Vec<RecordId>>,
}

/// Record content before the store assigns an identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewRecord {
    pub name: String,
    pub refs: Vec<RecordId>,
}

/// Persistence capability consumed by core services.
pub trait RecordStore {
    /// Returns the first record of `kind` whose `field` equals `value`.
    fn find_one(&self, kind: ResourceKind, field: Field, value: &str)
        -> RepoResult<Option<Record>>;

    /// Returns every record of `kind` whose `field` is in `values`.
    ///
    /// Duplicate values never yield the same record twice. Result order is
    /// unspecified.
    fn find_many(
        &self,
        kind: ResourceKind,
        field: Field,
        values: &[String],
        projection: Projection,
    ) -> RepoResult<Vec<Record>>;

    /// Persists a new record and returns it with its assigned identifier.
    fn insert(&self, kind: ResourceKind, record: &NewRecord) -> RepoResult<Record>;

    /// Returns all records of `kind` in insertion order.
    fn list(&self, kind: ResourceKind) -> RepoResult<Vec<Record>>;
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn find_one(
        &self,
        kind: ResourceKind,
        field: Field,
        value: &str,
    ) -> RepoResult<Option<Record>> {
        (**self).find_one(kind, field, value)
    }

    fn find_many(
        &self,
        kind: ResourceKind,
        field: Field,
        values: &[String],
        projection: Projection,
    ) -> RepoResult<Vec<Record>> {
        (**self).find_many(kind, field, values, projection)
    }

    fn insert(&self, kind: ResourceKind, record: &NewRecord) -> RepoResult<Record> {
        (**self).insert(kind, record)
    }

    fn list(&self, kind: ResourceKind) -> RepoResult<Vec<Record>> {
        (**self).list(kind)
    }
}

/// SQLite-backed record store.
pub struct SqliteRecordStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordStore<'conn> {
    /// Constructs a store from a connection opened via `db::open_db*`.
    ///
    /// # Errors
    /// - `SchemaNotReady` when migrations have not been applied.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let db_version = current_user_version(conn)?;
        let expected = latest_version();
        if db_version != expected {
            return Err(RepoError::SchemaNotReady {
                db_version,
                expected,
            });
        }
        Ok(Self { conn })
    }

    fn load_refs(&self, kind: ResourceKind, owner: RecordId) -> RepoResult<Vec<RecordId>> {
        let Some(ref_table) = ref_table(kind) else {
            return Ok(Vec::new());
        };

        let mut stmt = self.conn.prepare(&format!(
            "SELECT target_uuid FROM {ref_table}
             WHERE owner_uuid = ?1
             ORDER BY position ASC;"
        ))?;
        let mut rows = stmt.query([owner.to_string()])?;
        let mut refs = Vec::new();
        while let Some(row) = rows.next()? {
            let text: String = row.get(0)?;
            refs.push(parse_uuid(&text, ref_table)?);
        }
        Ok(refs)
    }

    fn full_record(&self, kind: ResourceKind, id: RecordId, name: String) -> RepoResult<Record> {
        Ok(Record {
            id,
            kind,
            name: Some(name),
            refs: Some(self.load_refs(kind, id)?),
        })
    }
}

impl RecordStore for SqliteRecordStore<'_> {
    fn find_one(
        &self,
        kind: ResourceKind,
        field: Field,
        value: &str,
    ) -> RepoResult<Option<Record>> {
        let table = table(kind);
        let column = column(field);
        let mut stmt = self.conn.prepare(&format!(
            "SELECT uuid, name FROM {table}
             WHERE {column} = ?1
             LIMIT 1;"
        ))?;

        let mut rows = stmt.query([value])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };
        let id_text: String = row.get(0)?;
        let name: String = row.get(1)?;
        let id = parse_uuid(&id_text, table)?;
        drop(rows);

        Ok(Some(self.full_record(kind, id, name)?))
    }

    fn find_many(
        &self,
        kind: ResourceKind,
        field: Field,
        values: &[String],
        projection: Projection,
    ) -> RepoResult<Vec<Record>> {
        let distinct: BTreeSet<&str> = values.iter().map(String::as_str).collect();
        if distinct.is_empty() {
            return Ok(Vec::new());
        }

        // One bound JSON array keeps any name count under SQLite's variable limit.
        let encoded = serde_json::to_string(&distinct).map_err(|err| {
            RepoError::InvalidData(format!("cannot encode lookup values: {err}"))
        })?;
        let table = table(kind);
        let column = column(field);
        let mut stmt = self.conn.prepare(&format!(
            "SELECT uuid, name FROM {table}
             WHERE {column} IN (SELECT value FROM json_each(?1));"
        ))?;

        let mut rows = stmt.query([encoded])?;
        let mut matched = Vec::new();
        while let Some(row) = rows.next()? {
            let id_text: String = row.get(0)?;
            let name: String = row.get(1)?;
            matched.push((parse_uuid(&id_text, table)?, name));
        }
        drop(rows);

        match projection {
            Projection::IdOnly => Ok(matched
                .into_iter()
                .map(|(id, _)| Record {
                    id,
                    kind,
                    name: None,
                    refs: None,
                })
                .collect()),
            Projection::Full => matched
                .into_iter()
                .map(|(id, name)| self.full_record(kind, id, name))
                .collect(),
        }
    }

    fn insert(&self, kind: ResourceKind, record: &NewRecord) -> RepoResult<Record> {
        if record.name.is_empty() {
            return Err(RepoError::InvalidData(format!(
                "{kind} record name must not be empty"
            )));
        }
        let ref_table = ref_table(kind);
        if ref_table.is_none() && !record.refs.is_empty() {
            return Err(RepoError::InvalidData(format!(
                "{kind} records do not hold references"
            )));
        }

        let id = Uuid::new_v4();
        let table = table(kind);
        // Core never opens an outer transaction on a store connection.
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            &format!("INSERT INTO {table} (uuid, name) VALUES (?1, ?2);"),
            params![id.to_string(), record.name.as_str()],
        )
        .map_err(|err| map_insert_error(err, kind, record.name.as_str()))?;

        if let Some(ref_table) = ref_table {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {ref_table} (owner_uuid, position, target_uuid)
                 VALUES (?1, ?2, ?3);"
            ))?;
            for (position, target) in record.refs.iter().enumerate() {
                stmt.execute(params![id.to_string(), position as i64, target.to_string()])?;
            }
            stmt.finalize()?;
        }
        tx.commit()?;

        Ok(Record {
            id,
            kind,
            name: Some(record.name.clone()),
            refs: Some(record.refs.clone()),
        })
    }

    fn list(&self, kind: ResourceKind) -> RepoResult<Vec<Record>> {
        let table = table(kind);
        let mut stmt = self.conn.prepare(&format!(
            "SELECT uuid, name FROM {table}
             ORDER BY created_at ASC, rowid ASC;"
        ))?;

        let mut rows = stmt.query([])?;
        let mut listed = Vec::new();
        while let Some(row) = rows.next()? {
            let id_text: String = row.get(0)?;
            let name: String = row.get(1)?;
            listed.push((parse_uuid(&id_text, table)?, name));
        }
        drop(rows);

        listed
            .into_iter()
            .map(|(id, name)| self.full_record(kind, id, name))
            .collect()
    }
}

fn table(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Goal => "goals",
        ResourceKind::Course => "courses",
        ResourceKind::Athenaeum => "athenaeums",
    }
}

fn ref_table(kind: ResourceKind) -> Option<&'static str> {
    match kind {
        ResourceKind::Goal => None,
        ResourceKind::Course => Some("course_goals"),
        ResourceKind::Athenaeum => Some("athenaeum_courses"),
    }
}

fn column(field: Field) -> &'static str {
    match field {
        Field::Id => "uuid",
        Field::Name => "name",
    }
}

fn parse_uuid(text: &str, table: &str) -> RepoResult<RecordId> {
    Uuid::parse_str(text)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{text}` in {table}")))
}

fn map_insert_error(err: rusqlite::Error, kind: ResourceKind, name: &str) -> RepoError {
    if let rusqlite::Error::SqliteFailure(failure, _) = &err {
        if failure.code == ErrorCode::ConstraintViolation
            && failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        {
            return RepoError::UniqueViolation {
                kind,
                field: Field::Name,
                value: name.to_string(),
            };
        }
    }
    err.into()
}
