//! PostgreSQL implementation of PhaseAccessStore.
//!
//! A missing row means "locked". Writes are conditional on the previous
//! `is_unlocked` value so that two racing toggles cannot both succeed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::db_error;
use crate::domain::foundation::{DomainError, PatientId, Timestamp};
use crate::domain::phase::{PhaseAccess, PhaseAccessRecord, ProtocolPhase};
use crate::ports::PhaseAccessStore;

#[derive(Clone)]
pub struct PostgresPhaseAccessStore {
    pool: PgPool,
}

impl PostgresPhaseAccessStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PhaseAccessStore for PostgresPhaseAccessStore {
    async fn read_phase_access(
        &self,
        patient_id: &PatientId,
    ) -> Result<Vec<PhaseAccessRecord>, DomainError> {
        let rows = sqlx::query(
            "SELECT patient_id, phase, is_unlocked, unlocked_at FROM phase_access WHERE patient_id = $1",
        )
        .bind(patient_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to read phase access"))?;

        let read = db_error("Failed to read phase access row");
        rows.iter()
            .map(|row| -> Result<PhaseAccessRecord, DomainError> {
                let phase: ProtocolPhase = row.try_get::<String, _>("phase").map_err(&read)?.parse()?;
                let unlocked_at: Option<DateTime<Utc>> = row.try_get("unlocked_at").map_err(&read)?;
                Ok(PhaseAccessRecord {
                    patient_id: PatientId::from_uuid(
                        row.try_get::<Uuid, _>("patient_id").map_err(&read)?,
                    ),
                    phase,
                    is_unlocked: row.try_get("is_unlocked").map_err(&read)?,
                    unlocked_at: unlocked_at.map(Timestamp::from_datetime),
                })
            })
            .collect()
    }

    async fn write_phase_access(
        &self,
        access: &PhaseAccess,
        expected_unlocked: bool,
    ) -> Result<(), DomainError> {
        let unlocked_at = access.unlocked_at().map(|t| *t.as_datetime());

        // Only a locked phase may be missing, so an insert is valid only when
        // the caller expected "locked".
        let statement = if expected_unlocked {
            r#"
            UPDATE phase_access
            SET is_unlocked = $3, unlocked_at = $4, updated_at = NOW()
            WHERE patient_id = $1 AND phase = $2 AND is_unlocked = TRUE
            "#
        } else {
            r#"
            INSERT INTO phase_access (patient_id, phase, is_unlocked, unlocked_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW())
            ON CONFLICT (patient_id, phase) DO UPDATE
            SET is_unlocked = EXCLUDED.is_unlocked,
                unlocked_at = EXCLUDED.unlocked_at,
                updated_at = NOW()
            WHERE phase_access.is_unlocked = FALSE
            "#
        };

        let result = sqlx::query(statement)
            .bind(access.patient_id().as_uuid())
            .bind(access.phase().as_str())
            .bind(access.is_unlocked())
            .bind(unlocked_at)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to write phase access"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::conflict(format!(
                "Phase '{}' for patient {} changed concurrently",
                access.phase(),
                access.patient_id()
            )));
        }

        Ok(())
    }
}
