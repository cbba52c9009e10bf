//! Timeout wrapper applied to every collaborator call.

use std::future::Future;
use std::time::Duration;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Applies the configured store timeout.
///
/// An elapsed timeout becomes a retryable `CollaboratorTimeout` error and
/// is never treated as a state change. No retry happens here.
#[derive(Debug, Clone, Copy)]
pub struct StoreGuard {
    timeout: Duration,
}

impl StoreGuard {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5_000);

    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Runs `call`, failing with `CollaboratorTimeout` if it takes too long.
    pub async fn call<T, F>(&self, operation: &'static str, call: F) -> Result<T, DomainError>
    where
        F: Future<Output = Result<T, DomainError>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    operation,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Store call timed out"
                );
                Err(DomainError::new(
                    ErrorCode::CollaboratorTimeout,
                    format!("{} timed out after {:?}", operation, self.timeout),
                )
                .with_detail("operation", operation))
            }
        }
    }
}

impl Default for StoreGuard {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TIMEOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn passes_through_results() {
        let guard = StoreGuard::from_millis(100);
        let value = guard.call("read", async { Ok::<_, DomainError>(7) }).await;
        assert_eq!(value.unwrap(), 7);
    }

    #[tokio::test]
    async fn passes_through_errors_unmodified() {
        let guard = StoreGuard::from_millis(100);
        let result: Result<(), _> = guard
            .call("read", async { Err(DomainError::database("connection reset")) })
            .await;
        let err = result.unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.message, "connection reset");
    }

    #[tokio::test]
    async fn elapsed_timeout_is_retryable() {
        let guard = StoreGuard::from_millis(10);
        let result: Result<(), _> = guard
            .call("write_phase_access", async {
                tokio::time::sleep(Duration::from_millis(200)).await;
                Ok(())
            })
            .await;

        let err = result.unwrap_err();
        assert_eq!(err.code, ErrorCode::CollaboratorTimeout);
        assert!(err.is_retryable());
        assert_eq!(err.details.get("operation"), Some(&"write_phase_access".to_string()));
    }
}
