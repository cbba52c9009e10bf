//! Adherence report read model and its pure assembler.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::action_plan::{ActionPlan, AssignedTask};
use crate::domain::adherence::{AdherenceCalculator, AdherenceSummary, PlanAdherence};
use crate::domain::foundation::{ActionPlanId, PatientId, TaskId, Timestamp, ValidationError};
use crate::domain::phase::{PatientPhases, PhaseAccess};
use crate::domain::schedule::FrequencyRecord;

/// Whether a task's plan had started by the report date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Active,
    NotStarted,
}

/// Adherence line for one task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskAdherence {
    pub task_id: TaskId,
    pub action_plan_id: ActionPlanId,
    pub description: String,
    #[serde(flatten)]
    pub frequency: FrequencyRecord,
    pub status: TaskStatus,
    #[serde(flatten)]
    pub summary: AdherenceSummary,
}

/// Combined phase and adherence read model for one patient.
#[derive(Debug, Clone, PartialEq)]
pub struct AdherenceReport {
    pub patient_id: PatientId,
    pub as_of: NaiveDate,
    pub generated_at: Timestamp,
    pub phases: Vec<PhaseAccess>,
    pub task_adherence: Vec<TaskAdherence>,
    pub plan_adherence: Vec<PlanAdherence>,
}

/// One task paired with its completion dates.
#[derive(Debug, Clone)]
pub struct TaskCompletionLog {
    pub task: AssignedTask,
    pub completion_dates: Vec<NaiveDate>,
}

/// Joins phase state with per-task and per-plan adherence. No I/O.
pub struct AdherenceReportAssembler;

impl AdherenceReportAssembler {
    /// Builds the report.
    ///
    /// Tasks whose plan starts after `as_of` are reported as `NotStarted`
    /// with nothing expected, so one early plan never fails the report.
    /// Every plan in `plans` gets a line, including plans without tasks.
    pub fn assemble(
        patient_id: PatientId,
        phases: PatientPhases,
        plans: &[ActionPlan],
        logs: Vec<TaskCompletionLog>,
        as_of: NaiveDate,
        generated_at: Timestamp,
    ) -> Result<AdherenceReport, ValidationError> {
        let mut task_adherence = Vec::with_capacity(logs.len());
        let mut by_plan: BTreeMap<ActionPlanId, (NaiveDate, Vec<usize>)> = plans
            .iter()
            .map(|plan| (*plan.id(), (plan.start_date(), Vec::new())))
            .collect();

        for log in logs {
            let plan = &log.task.plan;
            let task = &log.task.task;

            let (status, summary) = if plan.has_started(as_of) {
                let summary = AdherenceCalculator::summarize(&log.task, &log.completion_dates, as_of)?;
                (TaskStatus::Active, summary)
            } else {
                let mut summary = AdherenceSummary::vacuous();
                summary.warnings = task.frequency().warnings().to_vec();
                (TaskStatus::NotStarted, summary)
            };

            by_plan
                .entry(*plan.id())
                .or_insert_with(|| (plan.start_date(), Vec::new()))
                .1
                .push(task_adherence.len());

            task_adherence.push(TaskAdherence {
                task_id: *task.id(),
                action_plan_id: *plan.id(),
                description: task.description().to_string(),
                frequency: task.frequency().clone().into(),
                status,
                summary,
            });
        }

        let mut plan_adherence: Vec<PlanAdherence> = by_plan
            .into_iter()
            .map(|(plan_id, (start_date, indices))| {
                AdherenceCalculator::plan_adherence(
                    plan_id,
                    start_date,
                    indices.iter().map(|i| &task_adherence[*i].summary),
                )
            })
            .collect();
        plan_adherence.sort_by(|a, b| {
            a.start_date
                .cmp(&b.start_date)
                .then_with(|| a.action_plan_id.cmp(&b.action_plan_id))
        });

        Ok(AdherenceReport {
            patient_id,
            as_of,
            generated_at,
            phases: phases.into_vec(),
            task_adherence,
            plan_adherence,
        })
    }
}
