//! Phase gate error types.

use crate::domain::foundation::{DomainError, ErrorCode, PatientId, ValidationError};

/// Errors from phase gate operations.
#[derive(Debug, Clone)]
pub enum PhaseGateError {
    /// Patient is unknown to the patient directory.
    PatientNotFound(PatientId),
    /// Unknown phase token or a malformed stored record.
    Validation(ValidationError),
    /// Store failure, timeout or lost compare-and-swap; passed through.
    Store(DomainError),
}

impl PhaseGateError {
    pub fn code(&self) -> ErrorCode {
        match self {
            PhaseGateError::PatientNotFound(_) => ErrorCode::PatientNotFound,
            PhaseGateError::Validation(err) => err.code(),
            PhaseGateError::Store(err) => err.code,
        }
    }

    /// True for concurrent modification of the same (patient, phase) key.
    pub fn is_conflict(&self) -> bool {
        self.code() == ErrorCode::ConcurrencyConflict
    }
}

impl std::fmt::Display for PhaseGateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PhaseGateError::PatientNotFound(id) => write!(f, "Patient not found: {}", id),
            PhaseGateError::Validation(err) => write!(f, "{}", err),
            PhaseGateError::Store(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for PhaseGateError {}

impl From<DomainError> for PhaseGateError {
    fn from(err: DomainError) -> Self {
        PhaseGateError::Store(err)
    }
}

impl From<ValidationError> for PhaseGateError {
    fn from(err: ValidationError) -> Self {
        PhaseGateError::Validation(err)
    }
}

impl From<PhaseGateError> for DomainError {
    fn from(err: PhaseGateError) -> Self {
        match err {
            PhaseGateError::PatientNotFound(id) => {
                DomainError::new(ErrorCode::PatientNotFound, format!("Patient not found: {}", id))
                    .with_detail("patient_id", id.to_string())
            }
            PhaseGateError::Validation(err) => err.into(),
            PhaseGateError::Store(err) => err,
        }
    }
}
