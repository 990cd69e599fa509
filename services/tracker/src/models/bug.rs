//! Bug model, its enumerations and search criteria

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Raised when text does not name a known enum value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Bug priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Critical,
        Priority::High,
        Priority::Medium,
        Priority::Low,
    ];

    /// Stored name, e.g. `CRITICAL`
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Critical => "CRITICAL",
            Priority::High => "HIGH",
            Priority::Medium => "MEDIUM",
            Priority::Low => "LOW",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Priority::Critical => "Critical",
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownVariant {
                kind: "priority",
                value: s.to_string(),
            })
    }
}

/// Bug status
///
/// Any status may be replaced by any other; there is no enforced workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Open,
    InProgress,
    Resolved,
    Closed,
    Reopened,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::Open,
        Status::InProgress,
        Status::Resolved,
        Status::Closed,
        Status::Reopened,
    ];

    /// Stored name, e.g. `IN_PROGRESS`
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Open => "OPEN",
            Status::InProgress => "IN_PROGRESS",
            Status::Resolved => "RESOLVED",
            Status::Closed => "CLOSED",
            Status::Reopened => "REOPENED",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Status::Open => "Open",
            Status::InProgress => "In Progress",
            Status::Resolved => "Resolved",
            Status::Closed => "Closed",
            Status::Reopened => "Reopened",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Status::ALL
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownVariant {
                kind: "status",
                value: s.to_string(),
            })
    }
}

/// Bug entity
///
/// Assigned users are not carried here; they are read from the
/// assignment relation when needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Bug {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New bug creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBug {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: Status,
    /// Users to assign when the bug is created
    #[serde(default)]
    pub assignee_ids: Vec<i64>,
}

/// Replacement values for a bug update
///
/// Assignment is deliberately absent: it changes through its own operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BugDetails {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: Status,
}

/// Bug fields a search may target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchableBugField {
    Title,
    Description,
    Status,
    Priority,
}

impl SearchableBugField {
    pub const ALL: [SearchableBugField; 4] = [
        SearchableBugField::Title,
        SearchableBugField::Description,
        SearchableBugField::Status,
        SearchableBugField::Priority,
    ];

    /// Column and form-field name
    pub fn field_name(&self) -> &'static str {
        match self {
            SearchableBugField::Title => "title",
            SearchableBugField::Description => "description",
            SearchableBugField::Status => "status",
            SearchableBugField::Priority => "priority",
        }
    }
}

impl FromStr for SearchableBugField {
    type Err = UnknownVariant;

    /// Accepts the field name in any case, e.g. `title` or `TITLE`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        SearchableBugField::ALL
            .into_iter()
            .find(|f| f.field_name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownVariant {
                kind: "search field",
                value: s.to_string(),
            })
    }
}

/// A single-field bug search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BugCriteria {
    pub field: SearchableBugField,
    pub value: String,
    /// Text fields match by substring unless set; enum fields always match exactly
    #[serde(default)]
    pub exact_match: bool,
}

impl BugCriteria {
    pub fn new(field: SearchableBugField, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            exact_match: false,
        }
    }

    pub fn exact(mut self) -> Self {
        self.exact_match = true;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enums_parse_case_insensitively() {
        assert_eq!("high".parse::<Priority>(), Ok(Priority::High));
        assert_eq!(" CRITICAL ".parse::<Priority>(), Ok(Priority::Critical));
        assert_eq!("in_progress".parse::<Status>(), Ok(Status::InProgress));
        assert!("urgent".parse::<Priority>().is_err());
        assert!("in progress".parse::<Status>().is_err());
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Status::InProgress.display_name(), "In Progress");
        assert_eq!(Status::InProgress.to_string(), "IN_PROGRESS");
        assert_eq!(Priority::Low.display_name(), "Low");
    }

    #[test]
    fn test_enums_serialize_as_stored_names() {
        let json = serde_json::to_string(&Status::Reopened).expect("serialize");
        assert_eq!(json, "\"REOPENED\"");
        let parsed: Priority = serde_json::from_str("\"MEDIUM\"").expect("deserialize");
        assert_eq!(parsed, Priority::Medium);
    }

    #[test]
    fn test_searchable_field_lookup() {
        assert_eq!(
            "Title".parse::<SearchableBugField>(),
            Ok(SearchableBugField::Title)
        );
        assert_eq!(
            "PRIORITY".parse::<SearchableBugField>(),
            Ok(SearchableBugField::Priority)
        );
        assert!("assignee".parse::<SearchableBugField>().is_err());
    }

    #[test]
    fn test_blank_criteria_is_empty() {
        assert!(BugCriteria::new(SearchableBugField::Title, "  ").is_empty());
        let criteria = BugCriteria::new(SearchableBugField::Title, "login").exact();
        assert!(!criteria.is_empty());
        assert!(criteria.exact_match);
    }
}
