//! PostgreSQL implementation of PatientDirectory.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::db_error;
use crate::domain::action_plan::Patient;
use crate::domain::foundation::{DomainError, PatientId, TherapistId};
use crate::ports::PatientDirectory;

#[derive(Clone)]
pub struct PostgresPatientDirectory {
    pool: PgPool,
}

impl PostgresPatientDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PatientDirectory for PostgresPatientDirectory {
    async fn find_patient(&self, id: &PatientId) -> Result<Option<Patient>, DomainError> {
        let row: Option<(Uuid, String, Option<String>)> = sqlx::query_as(
            "SELECT id, full_name, assigned_therapist_id FROM patients WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to fetch patient"))?;

        let Some((id, full_name, therapist)) = row else {
            return Ok(None);
        };

        let patient = Patient::new(PatientId::from_uuid(id), full_name);
        Ok(Some(match therapist {
            Some(therapist) => patient.with_therapist(TherapistId::new(therapist)?),
            None => patient,
        }))
    }
}
