//! Identifier newtypes with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A required reference (task, category, user or entry ID) was absent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{field} is required")]
pub struct MissingReference {
    pub field: &'static str,
}

/// Generates a validated string ID newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new ID, rejecting empty or whitespace-only values.
            pub fn new(id: impl Into<String>) -> Result<Self, MissingReference> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(MissingReference { field: $field_name });
                }
                Ok(Self(id))
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = MissingReference;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = MissingReference;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(
    /// A validated time entry identifier.
    ///
    /// Fresh entries get a random UUID; entries restored from storage keep
    /// whatever non-empty ID they were saved with.
    TimeEntryId, "time entry ID"
);

define_string_id!(
    /// Reference to a task owned by the entry's user.
    TaskId, "task ID"
);

define_string_id!(
    /// Reference to a work category owned by the entry's user.
    CategoryId, "category ID"
);

define_string_id!(
    /// The user who owns an entry. Conflicts are scoped to a single user.
    UserId, "user ID"
);

impl TimeEntryId {
    /// Generates a fresh random entry ID.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_reject_empty() {
        assert!(TaskId::new("").is_err());
        assert!(CategoryId::new("").is_err());
        assert!(UserId::new("").is_err());
        assert!(TimeEntryId::new("").is_err());
        assert!(TaskId::new("task-1").is_ok());
    }

    #[test]
    fn ids_reject_whitespace_only() {
        let err = UserId::new("   ").unwrap_err();
        assert_eq!(err, MissingReference { field: "user ID" });
        assert_eq!(err.to_string(), "user ID is required");
    }

    #[test]
    fn generated_entry_ids_are_unique() {
        let a = TimeEntryId::generate();
        let b = TimeEntryId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }

    #[test]
    fn task_id_serde_roundtrip() {
        let id = TaskId::new("task-123").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"task-123\"");
        let parsed: TaskId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn user_id_serde_rejects_empty() {
        let result: Result<UserId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn category_id_as_ref() {
        let id = CategoryId::new("design").unwrap();
        let s: &str = id.as_ref();
        assert_eq!(s, "design");
    }
}
