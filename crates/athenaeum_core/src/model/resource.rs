//! Goal, Course and Athenaeum records plus create inputs.
//!
//! # Invariants
//! - `Athenaeum::courses` holds ids of courses that existed at creation time.
//! - `Course::goals` holds ids of goals that existed at creation time.
//! - Input reference lists carry *names*; stored records carry *ids*.

use super::kind::RecordId;
use serde::{Deserialize, Serialize};

/// Leaf resource identified by a unique name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: RecordId,
    pub name: String,
}

/// Course with weak references to goals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: RecordId,
    pub name: String,
    /// Goal ids resolved from names at creation time.
    pub goals: Vec<RecordId>,
}

/// Composite resource with weak references to courses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Athenaeum {
    pub id: RecordId,
    /// Unique across all athenaeums at the moment of creation.
    pub name: String,
    /// Course ids resolved from names at creation time.
    pub courses: Vec<RecordId>,
}

/// Input for creating one goal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalInput {
    #[serde(default)]
    pub name: String,
}

/// Input for creating one course.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseInput {
    #[serde(default)]
    pub name: String,
    /// Goal names, resolved leniently.
    #[serde(default)]
    pub goals: Vec<String>,
}

/// Input for creating one athenaeum.
///
/// An absent `name` deserializes to an empty string and is rejected as a
/// required-field failure by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AthenaeumInput {
    #[serde(default)]
    pub name: String,
    /// Course names, resolved leniently.
    #[serde(default)]
    pub courses: Vec<String>,
}

impl AthenaeumInput {
    pub fn new<I, S>(name: impl Into<String>, courses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            courses: courses.into_iter().map(Into::into).collect(),
        }
    }
}

impl CourseInput {
    pub fn new<I, S>(name: impl Into<String>, goals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            goals: goals.into_iter().map(Into::into).collect(),
        }
    }
}

impl GoalInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
