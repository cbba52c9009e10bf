//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Declares a UUID-backed identifier with the usual constructors,
/// `Display` and `FromStr`.
macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wraps an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

uuid_identifier!(
    /// Opaque reference to a patient managed by the patient-management system.
    PatientId
);

uuid_identifier!(
    /// Unique identifier for a therapist-authored action plan.
    ActionPlanId
);

uuid_identifier!(
    /// Unique identifier for a recurring task inside an action plan.
    TaskId
);

uuid_identifier!(
    /// Unique identifier for a single task completion record.
    CompletionId
);

/// Identity of the therapist performing an action.
///
/// Supplied explicitly by the caller on every mutating operation; the core
/// never looks it up from ambient session state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TherapistId(String);

impl TherapistId {
    /// Creates a new TherapistId, returning error if blank.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("therapist_id"));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TherapistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patient_id_generates_unique_values() {
        assert_ne!(PatientId::new(), PatientId::new());
    }

    #[test]
    fn task_id_parses_from_valid_string() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let id: TaskId = uuid_str.parse().unwrap();
        assert_eq!(id.to_string(), uuid_str);
    }

    #[test]
    fn action_plan_id_rejects_garbage() {
        assert!("not-a-uuid".parse::<ActionPlanId>().is_err());
    }

    #[test]
    fn completion_id_from_uuid_preserves_value() {
        let uuid = Uuid::new_v4();
        assert_eq!(CompletionId::from_uuid(uuid).as_uuid(), &uuid);
    }

    #[test]
    fn patient_id_serializes_as_bare_string() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let id: PatientId = uuid_str.parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", uuid_str));
    }

    #[test]
    fn therapist_id_rejects_blank_string() {
        match TherapistId::new("   ") {
            Err(ValidationError::EmptyField { field }) => assert_eq!(field, "therapist_id"),
            other => panic!("Expected EmptyField error, got {:?}", other),
        }
    }

    #[test]
    fn therapist_id_displays_inner_value() {
        let id = TherapistId::new("dr-ana").unwrap();
        assert_eq!(id.as_str(), "dr-ana");
        assert_eq!(format!("{}", id), "dr-ana");
    }
}
