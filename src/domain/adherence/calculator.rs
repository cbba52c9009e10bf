//! Adherence calculation over expected occurrences and a completion log.
//!
//! Matching is exact by calendar date with no grace window. A tolerance
//! (e.g. "within one day") would slot in at `summarize_occurrences`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::AdherenceRatio;
use crate::domain::action_plan::AssignedTask;
use crate::domain::foundation::{ActionPlanId, ValidationError};
use crate::domain::schedule::{Occurrences, RecurrenceEngine, ScheduleWarning};

/// Adherence of one task over `[start_date, as_of]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdherenceSummary {
    pub expected_count: usize,
    pub completed_count: usize,
    pub adherence_ratio: AdherenceRatio,
    /// Expected dates without any completion, ascending.
    pub missed_dates: Vec<NaiveDate>,
    /// Distinct completion dates that matched no expected date.
    pub extra_completions: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ScheduleWarning>,
}

impl AdherenceSummary {
    /// Summary of a task with nothing expected yet.
    pub fn vacuous() -> Self {
        Self {
            expected_count: 0,
            completed_count: 0,
            adherence_ratio: AdherenceRatio::PERFECT,
            missed_dates: Vec::new(),
            extra_completions: 0,
            warnings: Vec::new(),
        }
    }
}

/// Mean adherence across the tasks of one plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanAdherence {
    pub action_plan_id: ActionPlanId,
    pub start_date: NaiveDate,
    pub task_count: usize,
    pub adherence_ratio: AdherenceRatio,
}

/// Stateless adherence computations.
pub struct AdherenceCalculator;

impl AdherenceCalculator {
    /// Summarizes one task's completions up to `as_of`.
    ///
    /// # Errors
    ///
    /// `InvalidWindow` when `as_of` precedes the plan start date.
    pub fn summarize(
        task: &AssignedTask,
        completion_dates: &[NaiveDate],
        as_of: NaiveDate,
    ) -> Result<AdherenceSummary, ValidationError> {
        let occurrences = RecurrenceEngine::expected_occurrences(
            task.task.frequency(),
            task.plan.start_date(),
            as_of,
        )?;

        let mut summary = Self::summarize_occurrences(&occurrences, completion_dates);
        summary.warnings = task.task.frequency().warnings().to_vec();
        Ok(summary)
    }

    /// Matches completion dates against an already expanded schedule.
    pub fn summarize_occurrences(
        occurrences: &Occurrences,
        completion_dates: &[NaiveDate],
    ) -> AdherenceSummary {
        let completed: BTreeSet<NaiveDate> = completion_dates.iter().copied().collect();

        let mut expected_count = 0;
        let mut completed_count = 0;
        let mut missed_dates = Vec::new();
        for date in occurrences.iter() {
            expected_count += 1;
            if completed.contains(&date) {
                completed_count += 1;
            } else {
                missed_dates.push(date);
            }
        }

        let extra_completions = completed
            .iter()
            .filter(|date| !occurrences.contains(**date))
            .count();

        AdherenceSummary {
            expected_count,
            completed_count,
            adherence_ratio: AdherenceRatio::from_counts(completed_count, expected_count),
            missed_dates,
            extra_completions,
            warnings: Vec::new(),
        }
    }

    /// Plan-level adherence: the unweighted mean of per-task ratios.
    pub fn plan_adherence<'a>(
        action_plan_id: ActionPlanId,
        start_date: NaiveDate,
        task_summaries: impl IntoIterator<Item = &'a AdherenceSummary>,
    ) -> PlanAdherence {
        let ratios: Vec<AdherenceRatio> = task_summaries
            .into_iter()
            .map(|s| s.adherence_ratio)
            .collect();

        PlanAdherence {
            action_plan_id,
            start_date,
            task_count: ratios.len(),
            adherence_ratio: AdherenceRatio::mean(ratios),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::action_plan::{ActionPlan, Task};
    use crate::domain::foundation::{PatientId, TherapistId, Timestamp};
    use crate::domain::schedule::{Frequency, FrequencyKind};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn assigned(frequency: Frequency, start: NaiveDate) -> AssignedTask {
        let plan = ActionPlan::new(
            PatientId::new(),
            TherapistId::new("dr-lima").unwrap(),
            start,
            Timestamp::now(),
        );
        let task = Task::new(*plan.id(), "journal", frequency).unwrap();
        AssignedTask { plan, task }
    }

    #[test]
    fn daily_with_gaps() {
        let task = assigned(Frequency::Daily, date(2024, 1, 1));
        let summary = AdherenceCalculator::summarize(
            &task,
            &[date(2024, 1, 1), date(2024, 1, 3)],
            date(2024, 1, 5),
        )
        .unwrap();

        assert_eq!(summary.expected_count, 5);
        assert_eq!(summary.completed_count, 2);
        assert_eq!(summary.adherence_ratio.value(), 0.4);
        assert_eq!(
            summary.missed_dates,
            vec![date(2024, 1, 2), date(2024, 1, 4), date(2024, 1, 5)]
        );
        assert_eq!(summary.extra_completions, 0);
    }

    #[test]
    fn duplicate_completions_count_once() {
        let task = assigned(Frequency::Daily, date(2024, 1, 1));
        let summary = AdherenceCalculator::summarize(
            &task,
            &[date(2024, 1, 1), date(2024, 1, 1), date(2024, 1, 1)],
            date(2024, 1, 2),
        )
        .unwrap();

        assert_eq!(summary.completed_count, 1);
        assert_eq!(summary.adherence_ratio.value(), 0.5);
    }

    #[test]
    fn off_schedule_completions_are_extra() {
        let task = assigned(Frequency::Weekly, date(2024, 1, 1));
        let summary = AdherenceCalculator::summarize(
            &task,
            &[date(2024, 1, 1), date(2024, 1, 3), date(2024, 1, 4), date(2024, 1, 4)],
            date(2024, 1, 7),
        )
        .unwrap();

        assert_eq!(summary.expected_count, 1);
        assert_eq!(summary.completed_count, 1);
        assert_eq!(summary.extra_completions, 2);
    }

    #[test]
    fn completions_after_as_of_are_extra_not_completed() {
        let task = assigned(Frequency::Daily, date(2024, 1, 1));
        let summary =
            AdherenceCalculator::summarize(&task, &[date(2024, 1, 9)], date(2024, 1, 2)).unwrap();

        assert_eq!(summary.completed_count, 0);
        assert_eq!(summary.extra_completions, 1);
    }

    #[test]
    fn unparsable_custom_is_vacuously_adherent() {
        let frequency = Frequency::from_parts(FrequencyKind::Custom, Some("???")).unwrap();
        let task = assigned(frequency, date(2024, 1, 1));
        let summary = AdherenceCalculator::summarize(&task, &[], date(2024, 1, 14)).unwrap();

        assert_eq!(summary.expected_count, 0);
        assert_eq!(summary.adherence_ratio, AdherenceRatio::PERFECT);
        assert!(summary.warnings.contains(&ScheduleWarning::NoWeekdays));
    }

    #[test]
    fn window_before_start_is_rejected() {
        let task = assigned(Frequency::Daily, date(2024, 1, 10));
        let result = AdherenceCalculator::summarize(&task, &[], date(2024, 1, 1));
        assert!(matches!(result, Err(ValidationError::InvalidWindow { .. })));
    }

    #[test]
    fn plan_adherence_averages_tasks_equally() {
        let mut full = AdherenceSummary::vacuous();
        full.expected_count = 30;
        full.completed_count = 30;
        let mut none = AdherenceSummary::vacuous();
        none.expected_count = 1;
        none.adherence_ratio = AdherenceRatio::ZERO;

        let plan = AdherenceCalculator::plan_adherence(
            ActionPlanId::new(),
            date(2024, 1, 1),
            [&full, &none],
        );

        assert_eq!(plan.task_count, 2);
        assert_eq!(plan.adherence_ratio.value(), 0.5);
    }

    #[test]
    fn plan_without_tasks_is_perfect() {
        let plan = AdherenceCalculator::plan_adherence(
            ActionPlanId::new(),
            date(2024, 1, 1),
            Vec::<&AdherenceSummary>::new(),
        );
        assert_eq!(plan.adherence_ratio, AdherenceRatio::PERFECT);
    }
}
