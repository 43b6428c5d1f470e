//! Service-level error taxonomy.
//!
//! # Invariants
//! - Validation failures are always reported as a list, even with one entry.
//! - Storage failures are never folded into validation failures.

use crate::model::kind::{Field, ResourceKind};
use crate::repo::record_store::RepoError;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One user-facing validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Identifying field is empty or absent.
    Required { kind: ResourceKind, field: Field },
    /// Another record of the same kind already holds this value.
    Conflict { field: Field, value: String },
}

impl FieldError {
    /// Field the failure is attached to.
    pub fn field(&self) -> Field {
        match self {
            Self::Required { field, .. } | Self::Conflict { field, .. } => *field,
        }
    }

    /// Caller-facing message.
    pub fn message(&self) -> String {
        match self {
            Self::Required { kind, .. } => format!("{kind} field must not be empty"),
            Self::Conflict { value, .. } => format!("{value} already exists"),
        }
    }

    /// Serializable `{ field, message }` rendering.
    pub fn to_view(&self) -> FieldErrorView {
        FieldErrorView {
            field: self.field().as_str().to_string(),
            message: self.message(),
        }
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field(), self.message())
    }
}

impl Error for FieldError {}

/// Wire shape of a validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrorView {
    pub field: String,
    pub message: String,
}

/// Error returned by resource use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Input rejected; recoverable and reported to the caller.
    Invalid(Vec<FieldError>),
    /// Storage failure; propagated as an unexpected condition.
    Repo(RepoError),
}

impl ServiceError {
    /// Validation failures, or `None` for storage errors.
    pub fn field_errors(&self) -> Option<&[FieldError]> {
        match self {
            Self::Invalid(errors) => Some(errors.as_slice()),
            Self::Repo(_) => None,
        }
    }

    /// Whether this error should be reported as caller input failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(errors) => {
                write!(f, "validation failed:")?;
                for error in errors {
                    write!(f, " [{error}]")?;
                }
                Ok(())
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<FieldError> for ServiceError {
    fn from(value: FieldError) -> Self {
        Self::Invalid(vec![value])
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldError, ServiceError};
    use crate::model::kind::{Field, ResourceKind};
    use crate::repo::record_store::RepoError;

    #[test]
    fn conflict_message_names_the_value() {
        let error = FieldError::Conflict {
            field: Field::Name,
            value: "Downtown Library".to_string(),
        };
        let view = error.to_view();
        assert_eq!(view.field, "name");
        assert_eq!(view.message, "Downtown Library already exists");
    }

    #[test]
    fn required_message_uses_kind_label() {
        let error = FieldError::Required {
            kind: ResourceKind::Athenaeum,
            field: Field::Name,
        };
        assert_eq!(error.message(), "Athenaeum field must not be empty");
    }

    #[test]
    fn single_field_error_converts_into_list() {
        let error: ServiceError = FieldError::Required {
            kind: ResourceKind::Goal,
            field: Field::Name,
        }
        .into();
        assert!(error.is_validation());
        assert_eq!(error.field_errors().map(|errors| errors.len()), Some(1));
    }

    #[test]
    fn repo_errors_are_not_validation() {
        let error: ServiceError = RepoError::InvalidData("broken".to_string()).into();
        assert!(!error.is_validation());
        assert!(error.field_errors().is_none());
    }
}
