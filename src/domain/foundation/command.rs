//! Command infrastructure for CQRS handlers.
//!
//! `CommandMetadata` carries the acting therapist and tracing context through
//! every mutating operation. The actor is always an explicit argument; handlers
//! never consult ambient session state to find out who is acting.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::TherapistId;

/// Metadata context for command handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMetadata {
    /// The therapist executing this command.
    pub actor: TherapistId,

    /// Links related operations across a single request.
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,

    /// Source of this command (e.g., "api", "cli").
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
}

impl CommandMetadata {
    /// Creates new command metadata for the given actor.
    pub fn new(actor: TherapistId) -> Self {
        Self {
            actor,
            correlation_id: None,
            source: None,
        }
    }

    /// Builder: Add correlation ID for request tracing.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Builder: Add source identifier.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns the correlation ID, generating one if not set.
    pub fn correlation_id(&self) -> String {
        self.correlation_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }

    /// Returns the source if set.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

#[cfg(test)]
impl CommandMetadata {
    /// Creates a test fixture acting as a test therapist.
    pub fn test_fixture() -> Self {
        Self::new(TherapistId::new("therapist-test").unwrap())
            .with_correlation_id("test-correlation-id")
            .with_source("test")
    }
}
