//! Resource kinds and identifying fields.
//!
//! # Responsibility
//! - Name the persisted record categories handled by core.
//! - Describe, per kind, which other kind it references and whether storage
//!   enforces name uniqueness.
//!
//! # Invariants
//! - A kind references at most one other kind.
//! - `Athenaeum -> Course -> Goal` is the only reference chain.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier assigned to every stored record.
pub type RecordId = Uuid;

/// Named category of persisted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Leaf resource with only a name.
    Goal,
    /// Holds weak references to goals.
    Course,
    /// Composite resource holding weak references to courses.
    Athenaeum,
}

impl ResourceKind {
    /// Human-facing label, also used as the prefix of required-field messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Goal => "Goal",
            Self::Course => "Course",
            Self::Athenaeum => "Athenaeum",
        }
    }

    /// Kind whose identifiers this kind stores, if any.
    pub fn referenced_kind(self) -> Option<ResourceKind> {
        match self {
            Self::Goal => None,
            Self::Course => Some(Self::Goal),
            Self::Athenaeum => Some(Self::Course),
        }
    }

    /// Whether storage backs name uniqueness with a unique index.
    ///
    /// Course names are unique by expectation only.
    pub fn has_unique_name(self) -> bool {
        matches!(self, Self::Goal | Self::Athenaeum)
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Record attribute usable in exact-match lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Store-assigned identifier.
    Id,
    /// Identifying name.
    Name,
}

impl Field {
    /// Field name as reported to callers in validation errors.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{Field, ResourceKind};

    #[test]
    fn reference_chain_ends_at_goal() {
        assert_eq!(
            ResourceKind::Athenaeum.referenced_kind(),
            Some(ResourceKind::Course)
        );
        assert_eq!(
            ResourceKind::Course.referenced_kind(),
            Some(ResourceKind::Goal)
        );
        assert_eq!(ResourceKind::Goal.referenced_kind(), None);
    }

    #[test]
    fn course_names_are_not_index_backed() {
        assert!(ResourceKind::Athenaeum.has_unique_name());
        assert!(ResourceKind::Goal.has_unique_name());
        assert!(!ResourceKind::Course.has_unique_name());
    }

    #[test]
    fn field_names_match_external_schema() {
        assert_eq!(Field::Name.to_string(), "name");
        assert_eq!(Field::Id.as_str(), "id");
    }
}
