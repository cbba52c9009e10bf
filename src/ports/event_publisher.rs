//! EventPublisher port - Interface for publishing domain events.
//!
//! Handlers publish audit events without knowing where they end up
//! (in-memory bus in tests, structured logs in the server).

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Port for publishing domain events.
///
/// Implementations report delivery errors; handlers that publish after a
/// committed write log them instead of failing the command.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a single event.
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError>;
}
