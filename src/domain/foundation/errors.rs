//! Error types for the domain layer.

use chrono::NaiveDate;
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors raised while constructing value objects or validating inputs.
///
/// Validation always happens before any computation or mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("As-of date {as_of} is before start date {start_date}")]
    InvalidWindow {
        start_date: NaiveDate,
        as_of: NaiveDate,
    },

    #[error("Unknown protocol phase '{token}'")]
    UnknownPhase { token: String },

    #[error("Frequency '{frequency}' is inconsistent with its details: {reason}")]
    FrequencyMismatch { frequency: String, reason: String },

    #[error("Completion date {completion_date} precedes plan start date {start_date}")]
    CompletionBeforeStart {
        completion_date: NaiveDate,
        start_date: NaiveDate,
    },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid window error for `as_of < start_date`.
    pub fn invalid_window(start_date: NaiveDate, as_of: NaiveDate) -> Self {
        ValidationError::InvalidWindow { start_date, as_of }
    }

    /// Creates an unknown phase error.
    pub fn unknown_phase(token: impl Into<String>) -> Self {
        ValidationError::UnknownPhase { token: token.into() }
    }

    /// Creates a frequency/details mismatch error.
    pub fn frequency_mismatch(frequency: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::FrequencyMismatch {
            frequency: frequency.into(),
            reason: reason.into(),
        }
    }

    /// Maps the validation failure to its error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            ValidationError::EmptyField { .. } => ErrorCode::EmptyField,
            ValidationError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
            ValidationError::InvalidWindow { .. } => ErrorCode::InvalidWindow,
            ValidationError::UnknownPhase { .. } => ErrorCode::UnknownPhase,
            ValidationError::FrequencyMismatch { .. } => ErrorCode::FrequencyMismatch,
            ValidationError::CompletionBeforeStart { .. } => ErrorCode::CompletionBeforeStart,
        }
    }
}

/// Broad failure categories that callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    NotFound,
    ConcurrencyConflict,
    CollaboratorUnavailable,
    Internal,
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,
    EmptyField,
    InvalidFormat,
    InvalidWindow,
    UnknownPhase,
    FrequencyMismatch,
    CompletionBeforeStart,
    InvalidStateTransition,

    // Not found errors
    PatientNotFound,
    ActionPlanNotFound,
    TaskNotFound,

    // Concurrency
    ConcurrencyConflict,

    // Collaborator errors
    CollaboratorTimeout,
    CollaboratorUnavailable,
    DatabaseError,

    InternalError,
}

impl ErrorCode {
    /// Returns the category this code belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::InvalidFormat
            | ErrorCode::InvalidWindow
            | ErrorCode::UnknownPhase
            | ErrorCode::FrequencyMismatch
            | ErrorCode::CompletionBeforeStart
            | ErrorCode::InvalidStateTransition => ErrorKind::Validation,
            ErrorCode::PatientNotFound | ErrorCode::ActionPlanNotFound | ErrorCode::TaskNotFound => {
                ErrorKind::NotFound
            }
            ErrorCode::ConcurrencyConflict => ErrorKind::ConcurrencyConflict,
            ErrorCode::CollaboratorTimeout
            | ErrorCode::CollaboratorUnavailable
            | ErrorCode::DatabaseError => ErrorKind::CollaboratorUnavailable,
            ErrorCode::InternalError => ErrorKind::Internal,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::EmptyField => "EMPTY_FIELD",
            ErrorCode::InvalidFormat => "INVALID_FORMAT",
            ErrorCode::InvalidWindow => "INVALID_WINDOW",
            ErrorCode::UnknownPhase => "UNKNOWN_PHASE",
            ErrorCode::FrequencyMismatch => "FREQUENCY_MISMATCH",
            ErrorCode::CompletionBeforeStart => "COMPLETION_BEFORE_START",
            ErrorCode::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            ErrorCode::PatientNotFound => "PATIENT_NOT_FOUND",
            ErrorCode::ActionPlanNotFound => "ACTION_PLAN_NOT_FOUND",
            ErrorCode::TaskNotFound => "TASK_NOT_FOUND",
            ErrorCode::ConcurrencyConflict => "CONCURRENCY_CONFLICT",
            ErrorCode::CollaboratorTimeout => "COLLABORATOR_TIMEOUT",
            ErrorCode::CollaboratorUnavailable => "COLLABORATOR_UNAVAILABLE",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Creates a database error from an adapter failure.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Creates a concurrency conflict for a lost compare-and-swap.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConcurrencyConflict, message)
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        self.code.kind()
    }

    /// Timeouts and unavailable collaborators may be retried by the boundary
    /// layer; nothing else should be.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::CollaboratorUnavailable
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        let code = err.code();
        let error = DomainError::new(code, err.to_string());
        match err {
            ValidationError::EmptyField { field } | ValidationError::InvalidFormat { field, .. } => {
                error.with_detail("field", field)
            }
            ValidationError::UnknownPhase { token } => error.with_detail("phase", token),
            _ => error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn validation_error_empty_field_displays_correctly() {
        let err = ValidationError::empty_field("description");
        assert_eq!(format!("{}", err), "Field 'description' cannot be empty");
    }

    #[test]
    fn invalid_window_names_both_dates() {
        let err = ValidationError::invalid_window(date(2024, 1, 5), date(2024, 1, 1));
        assert_eq!(
            format!("{}", err),
            "As-of date 2024-01-01 is before start date 2024-01-05"
        );
    }

    #[test]
    fn domain_error_displays_code_and_message() {
        let err = DomainError::new(ErrorCode::PatientNotFound, "Patient not found");
        assert_eq!(format!("{}", err), "[PATIENT_NOT_FOUND] Patient not found");
    }

    #[test]
    fn validation_error_converts_with_field_detail() {
        let err: DomainError = ValidationError::empty_field("description").into();
        assert_eq!(err.code, ErrorCode::EmptyField);
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.details.get("field"), Some(&"description".to_string()));
    }

    #[test]
    fn unknown_phase_converts_with_phase_detail() {
        let err: DomainError = ValidationError::unknown_phase("eighth").into();
        assert_eq!(err.code, ErrorCode::UnknownPhase);
        assert_eq!(err.details.get("phase"), Some(&"eighth".to_string()));
    }

    #[test]
    fn only_collaborator_failures_are_retryable() {
        assert!(DomainError::new(ErrorCode::CollaboratorTimeout, "slow").is_retryable());
        assert!(DomainError::database("down").is_retryable());
        assert!(!DomainError::conflict("lost update").is_retryable());
        assert!(!DomainError::new(ErrorCode::TaskNotFound, "gone").is_retryable());
    }

    #[test]
    fn error_codes_map_to_kinds() {
        assert_eq!(ErrorCode::InvalidWindow.kind(), ErrorKind::Validation);
        assert_eq!(ErrorCode::TaskNotFound.kind(), ErrorKind::NotFound);
        assert_eq!(ErrorCode::ConcurrencyConflict.kind(), ErrorKind::ConcurrencyConflict);
        assert_eq!(ErrorCode::DatabaseError.kind(), ErrorKind::CollaboratorUnavailable);
    }
}
