//! PostgreSQL implementation of ActionPlanStore.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::{db_error, skip_malformed};
use crate::domain::action_plan::{ActionPlan, AssignedTask, Task, TaskCompletion};
use crate::domain::foundation::{
    ActionPlanId, DomainError, PatientId, TaskId, TherapistId, Timestamp,
};
use crate::domain::schedule::{Frequency, FrequencyKind};
use crate::ports::ActionPlanStore;

const PLAN_COLUMNS: &str =
    "p.id AS plan_id, p.patient_id, p.therapist_id, p.start_date, p.created_at AS plan_created_at";

/// PostgreSQL implementation of ActionPlanStore.
#[derive(Clone)]
pub struct PostgresActionPlanStore {
    pool: PgPool,
}

impl PostgresActionPlanStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActionPlanStore for PostgresActionPlanStore {
    async fn create_plan(&self, plan: &ActionPlan) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO action_plans (id, patient_id, therapist_id, start_date, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(plan.id().as_uuid())
        .bind(plan.patient_id().as_uuid())
        .bind(plan.therapist_id().as_str())
        .bind(plan.start_date())
        .bind(plan.created_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to insert action plan"))?;

        Ok(())
    }

    async fn find_plan(&self, id: &ActionPlanId) -> Result<Option<ActionPlan>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM action_plans p WHERE p.id = $1",
            PLAN_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to fetch action plan"))?;

        row.as_ref().map(row_to_plan).transpose()
    }

    async fn list_plans_for_patient(
        &self,
        patient_id: &PatientId,
    ) -> Result<Vec<ActionPlan>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM action_plans p WHERE p.patient_id = $1 ORDER BY p.start_date, p.created_at",
            PLAN_COLUMNS
        ))
        .bind(patient_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list action plans"))?;

        Ok(skip_malformed(&rows, "action_plan", row_to_plan))
    }

    async fn add_task(&self, task: &Task) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO tasks (id, action_plan_id, description, frequency, custom_frequency_details)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(task.id().as_uuid())
        .bind(task.action_plan_id().as_uuid())
        .bind(task.description())
        .bind(task.frequency().kind().as_str())
        .bind(task.frequency().custom_details())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to insert task"))?;

        Ok(())
    }

    async fn find_task(&self, id: &TaskId) -> Result<Option<AssignedTask>, DomainError> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {}, t.id AS task_id, t.description, t.frequency, t.custom_frequency_details
            FROM tasks t
            JOIN action_plans p ON p.id = t.action_plan_id
            WHERE t.id = $1
            "#,
            PLAN_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to fetch task"))?;

        row.as_ref().map(row_to_assigned_task).transpose()
    }

    async fn list_tasks_for_patient(
        &self,
        patient_id: &PatientId,
    ) -> Result<Vec<AssignedTask>, DomainError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {}, t.id AS task_id, t.description, t.frequency, t.custom_frequency_details
            FROM tasks t
            JOIN action_plans p ON p.id = t.action_plan_id
            WHERE p.patient_id = $1
            ORDER BY p.start_date, p.created_at, t.created_at
            "#,
            PLAN_COLUMNS
        ))
        .bind(patient_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list tasks"))?;

        Ok(skip_malformed(&rows, "task", row_to_assigned_task))
    }

    async fn list_completions(&self, task_id: &TaskId) -> Result<Vec<NaiveDate>, DomainError> {
        let rows: Vec<(NaiveDate,)> = sqlx::query_as(
            "SELECT completion_date FROM task_completions WHERE task_id = $1 ORDER BY completion_date",
        )
        .bind(task_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list completions"))?;

        Ok(rows.into_iter().map(|(date,)| date).collect())
    }

    async fn record_completion(&self, completion: &TaskCompletion) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO task_completions (id, task_id, completion_date, recorded_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(completion.id.as_uuid())
        .bind(completion.task_id.as_uuid())
        .bind(completion.completion_date)
        .bind(completion.recorded_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to insert completion"))?;

        Ok(())
    }
}

fn row_to_plan(row: &PgRow) -> Result<ActionPlan, DomainError> {
    let read = db_error("Failed to read action plan row");
    let therapist: String = row.try_get("therapist_id").map_err(&read)?;
    let created_at: DateTime<Utc> = row.try_get("plan_created_at").map_err(&read)?;

    Ok(ActionPlan::reconstitute(
        ActionPlanId::from_uuid(row.try_get::<Uuid, _>("plan_id").map_err(&read)?),
        PatientId::from_uuid(row.try_get::<Uuid, _>("patient_id").map_err(&read)?),
        TherapistId::new(therapist)?,
        row.try_get("start_date").map_err(&read)?,
        Timestamp::from_datetime(created_at),
    ))
}

fn row_to_assigned_task(row: &PgRow) -> Result<AssignedTask, DomainError> {
    let read = db_error("Failed to read task row");
    let plan = row_to_plan(row)?;

    let kind: FrequencyKind = row
        .try_get::<String, _>("frequency")
        .map_err(&read)?
        .parse()?;
    let details: Option<String> = row.try_get("custom_frequency_details").map_err(&read)?;
    let frequency = Frequency::from_parts(kind, details.as_deref())?;
    let description: String = row.try_get("description").map_err(&read)?;

    let task = Task::reconstitute(
        TaskId::from_uuid(row.try_get::<Uuid, _>("task_id").map_err(&read)?),
        *plan.id(),
        description,
        frequency,
    )?;

    Ok(AssignedTask { plan, task })
}
