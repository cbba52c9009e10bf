//! Request extractors.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::error::ErrorResponse;
use crate::domain::foundation::{CommandMetadata, TherapistId};

/// Header naming the therapist performing the request.
pub const THERAPIST_HEADER: &str = "x-therapist-id";

/// Header carrying a caller-supplied correlation id.
pub const CORRELATION_HEADER: &str = "x-request-id";

/// The therapist on whose behalf a mutating request runs.
#[derive(Debug, Clone)]
pub struct ActingTherapist {
    pub therapist_id: TherapistId,
    pub correlation_id: Option<String>,
}

impl ActingTherapist {
    pub fn metadata(self) -> CommandMetadata {
        let metadata = CommandMetadata::new(self.therapist_id).with_source("http");
        match self.correlation_id {
            Some(id) => metadata.with_correlation_id(id),
            None => metadata,
        }
    }
}

/// Rejection when the actor header is missing or blank.
pub struct MissingTherapist;

impl IntoResponse for MissingTherapist {
    fn into_response(self) -> Response {
        let error = ErrorResponse {
            code: "MISSING_ACTOR".to_string(),
            message: format!("Header '{}' is required", THERAPIST_HEADER),
            details: None,
        };
        (StatusCode::UNAUTHORIZED, Json(error)).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ActingTherapist
where
    S: Send + Sync,
{
    type Rejection = MissingTherapist;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let therapist_id = parts
            .headers
            .get(THERAPIST_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| TherapistId::new(s).ok())
            .ok_or(MissingTherapist)?;

        let correlation_id = parts
            .headers
            .get(CORRELATION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Ok(ActingTherapist {
            therapist_id,
            correlation_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Result<ActingTherapist, MissingTherapist> {
        let (mut parts, _) = request.into_parts();
        ActingTherapist::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn reads_therapist_and_correlation() {
        let request = Request::builder()
            .header(THERAPIST_HEADER, "dr-lima")
            .header(CORRELATION_HEADER, "req-7")
            .body(())
            .unwrap();

        let actor = extract(request).await.ok().unwrap();
        let metadata = actor.metadata();
        assert_eq!(metadata.actor.as_str(), "dr-lima");
        assert_eq!(metadata.correlation_id(), "req-7");
        assert_eq!(metadata.source(), Some("http"));
    }

    #[tokio::test]
    async fn blank_header_is_rejected() {
        let request = Request::builder()
            .header(THERAPIST_HEADER, "   ")
            .body(())
            .unwrap();
        assert!(extract(request).await.is_err());
    }

    #[tokio::test]
    async fn missing_header_is_rejected() {
        let request = Request::builder().body(()).unwrap();
        assert!(extract(request).await.is_err());
    }
}
