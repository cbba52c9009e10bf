//! End-to-end adherence scenarios and recurrence properties.
//!
//! Drives the report query through in-memory stores the way the HTTP layer
//! does, then checks the recurrence engine's invariants with proptest.

use chrono::{Datelike, Duration, NaiveDate};
use proptest::prelude::*;
use std::sync::Arc;

use protocol_adherence::adapters::{
    FixedClock, InMemoryActionPlanStore, InMemoryPatientDirectory, InMemoryPhaseAccessStore,
};
use protocol_adherence::application::{
    GetAdherenceReportHandler, GetAdherenceReportQuery, StoreGuard,
};
use protocol_adherence::domain::action_plan::{ActionPlan, Task, TaskCompletion};
use protocol_adherence::domain::adherence::AdherenceRatio;
use protocol_adherence::domain::foundation::{
    ErrorCode, PatientId, TaskId, TherapistId, Timestamp,
};
use protocol_adherence::domain::report::{AdherenceReport, TaskAdherence};
use protocol_adherence::domain::schedule::{
    CustomSchedule, Frequency, RecurrenceEngine, WeekdaySet,
};
use protocol_adherence::ports::ActionPlanStore;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

struct Clinic {
    patients: InMemoryPatientDirectory,
    plans: InMemoryActionPlanStore,
    phases: InMemoryPhaseAccessStore,
}

impl Clinic {
    fn new() -> Self {
        Self {
            patients: InMemoryPatientDirectory::new(),
            plans: InMemoryActionPlanStore::new(),
            phases: InMemoryPhaseAccessStore::new(),
        }
    }

    /// Registers a patient with one plan and one task, and logs completions.
    async fn assign(
        &self,
        start: NaiveDate,
        frequency: Frequency,
        completions: &[NaiveDate],
    ) -> (PatientId, TaskId) {
        let patient_id = self.patients.register("Beatriz Costa").await;
        let plan = ActionPlan::new(
            patient_id,
            TherapistId::new("dr-lima").unwrap(),
            start,
            Timestamp::now(),
        );
        self.plans.create_plan(&plan).await.unwrap();
        let task = Task::new(*plan.id(), "Grounding exercise", frequency).unwrap();
        self.plans.add_task(&task).await.unwrap();
        for day in completions {
            let completion = TaskCompletion::record(&plan, *task.id(), *day, Timestamp::now()).unwrap();
            self.plans.record_completion(&completion).await.unwrap();
        }
        (patient_id, *task.id())
    }

    fn handler(&self) -> GetAdherenceReportHandler {
        GetAdherenceReportHandler::new(
            Arc::new(self.patients.clone()),
            Arc::new(self.plans.clone()),
            Arc::new(self.phases.clone()),
            Arc::new(FixedClock::new(Timestamp::now())),
            StoreGuard::default(),
        )
    }

    async fn report(&self, patient_id: PatientId, as_of: NaiveDate) -> AdherenceReport {
        self.handler()
            .handle(GetAdherenceReportQuery {
                patient_id,
                as_of: Some(as_of),
            })
            .await
            .unwrap()
    }
}

fn task_entry(report: &AdherenceReport, task_id: TaskId) -> &TaskAdherence {
    report
        .task_adherence
        .iter()
        .find(|t| t.task_id == task_id)
        .unwrap()
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn daily_task_with_two_completions_over_five_days() {
    let clinic = Clinic::new();
    let (patient, task) = clinic
        .assign(date(2024, 1, 1), Frequency::Daily, &[date(2024, 1, 1), date(2024, 1, 3)])
        .await;

    let report = clinic.report(patient, date(2024, 1, 5)).await;
    let summary = &task_entry(&report, task).summary;

    assert_eq!(summary.expected_count, 5);
    assert_eq!(summary.completed_count, 2);
    assert!((summary.adherence_ratio.value() - 0.4).abs() < 1e-9);
    assert_eq!(
        summary.missed_dates,
        vec![date(2024, 1, 2), date(2024, 1, 4), date(2024, 1, 5)]
    );
    assert_eq!(report.phases.len(), 5);
    assert!(report.phases.iter().all(|p| !p.is_unlocked()));
}

#[tokio::test]
async fn weekly_task_without_completions() {
    let clinic = Clinic::new();
    let (patient, task) = clinic.assign(date(2024, 1, 1), Frequency::Weekly, &[]).await;

    let report = clinic.report(patient, date(2024, 1, 15)).await;
    let summary = &task_entry(&report, task).summary;

    assert_eq!(summary.expected_count, 3);
    assert_eq!(summary.adherence_ratio, AdherenceRatio::ZERO);
    assert_eq!(
        summary.missed_dates,
        vec![date(2024, 1, 1), date(2024, 1, 8), date(2024, 1, 15)]
    );
}

#[tokio::test]
async fn custom_weekdays_over_two_weeks() {
    let clinic = Clinic::new();
    let schedule = CustomSchedule::parse("Mon,Wed,Fri").unwrap();
    let (patient, task) = clinic
        .assign(date(2024, 1, 1), Frequency::Custom(schedule), &[date(2024, 1, 3)])
        .await;

    let report = clinic.report(patient, date(2024, 1, 14)).await;
    let summary = &task_entry(&report, task).summary;

    assert_eq!(summary.expected_count, 6);
    assert_eq!(summary.completed_count, 1);
    assert!(summary.warnings.is_empty());
}

#[tokio::test]
async fn unparsable_custom_details_are_vacuously_adherent() {
    let clinic = Clinic::new();
    let schedule = CustomSchedule::parse("???").unwrap();
    let (patient, task) = clinic
        .assign(date(2024, 1, 1), Frequency::Custom(schedule), &[])
        .await;

    let report = clinic.report(patient, date(2024, 1, 14)).await;
    let summary = &task_entry(&report, task).summary;

    assert_eq!(summary.expected_count, 0);
    assert_eq!(summary.adherence_ratio, AdherenceRatio::PERFECT);
    assert!(!summary.warnings.is_empty());
}

#[tokio::test]
async fn unknown_patient_is_not_found() {
    let clinic = Clinic::new();

    let err = clinic
        .handler()
        .handle(GetAdherenceReportQuery {
            patient_id: PatientId::new(),
            as_of: Some(date(2024, 1, 5)),
        })
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::PatientNotFound);
}

#[tokio::test]
async fn plan_ratio_is_mean_of_task_ratios() {
    let clinic = Clinic::new();
    let (patient, _) = clinic
        .assign(date(2024, 1, 1), Frequency::Daily, &[date(2024, 1, 1), date(2024, 1, 2)])
        .await;

    let report = clinic.report(patient, date(2024, 1, 4)).await;

    assert_eq!(report.plan_adherence.len(), 1);
    assert_eq!(report.plan_adherence[0].task_count, 1);
    assert!((report.plan_adherence[0].adherence_ratio.value() - 0.5).abs() < 1e-9);
}

// =============================================================================
// Properties
// =============================================================================

fn frequency_strategy() -> impl Strategy<Value = Frequency> {
    prop_oneof![
        Just(Frequency::Daily),
        Just(Frequency::Weekly),
        prop::collection::vec(0u8..7, 0..7).prop_map(|days| {
            let tokens: Vec<String> = days.iter().map(|d| d.to_string()).collect();
            let details = if tokens.is_empty() { "none".to_string() } else { tokens.join(",") };
            Frequency::Custom(CustomSchedule::parse(details).unwrap())
        }),
    ]
}

fn start_strategy() -> impl Strategy<Value = NaiveDate> {
    (0i64..3_000).prop_map(|offset| date(2020, 1, 1) + Duration::days(offset))
}

proptest! {
    #[test]
    fn occurrences_stay_inside_the_window(
        frequency in frequency_strategy(),
        start in start_strategy(),
        span in 0i64..120,
    ) {
        let as_of = start + Duration::days(span);
        let occurrences = RecurrenceEngine::expected_occurrences(&frequency, start, as_of).unwrap();

        let dates: Vec<NaiveDate> = occurrences.iter().collect();
        prop_assert!(dates.iter().all(|d| *d >= start && *d <= as_of));
        prop_assert!(dates.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(dates.len(), occurrences.count());
    }

    #[test]
    fn count_is_monotonic_in_as_of(
        frequency in frequency_strategy(),
        start in start_strategy(),
        span in 0i64..120,
        extra in 0i64..30,
    ) {
        let earlier = start + Duration::days(span);
        let later = earlier + Duration::days(extra);

        let a = RecurrenceEngine::expected_occurrences(&frequency, start, earlier).unwrap().count();
        let b = RecurrenceEngine::expected_occurrences(&frequency, start, later).unwrap().count();
        prop_assert!(a <= b);
    }

    #[test]
    fn weekly_dates_are_seven_days_apart(start in start_strategy(), span in 0i64..400) {
        let as_of = start + Duration::days(span);
        let dates: Vec<NaiveDate> = RecurrenceEngine::expected_occurrences(&Frequency::Weekly, start, as_of)
            .unwrap()
            .iter()
            .collect();

        prop_assert_eq!(dates.first().copied(), Some(start));
        prop_assert!(dates.windows(2).all(|w| (w[1] - w[0]).num_days() == 7));
    }

    #[test]
    fn custom_dates_fall_on_listed_weekdays(
        days in prop::collection::vec(0u8..7, 1..7),
        start in start_strategy(),
        span in 0i64..60,
    ) {
        let set = WeekdaySet::from_indices(days.iter().copied());
        let details: Vec<String> = days.iter().map(|d| d.to_string()).collect();
        let frequency = Frequency::Custom(CustomSchedule::parse(details.join(" ")).unwrap());
        let as_of = start + Duration::days(span);

        for day in RecurrenceEngine::expected_occurrences(&frequency, start, as_of).unwrap().iter() {
            prop_assert!(set.contains(day.weekday()));
        }
    }

    #[test]
    fn ratio_is_bounded(completed in 0usize..500, expected in 0usize..500) {
        let ratio = AdherenceRatio::from_counts(completed.min(expected), expected).value();
        prop_assert!((0.0..=1.0).contains(&ratio));
        if expected == 0 {
            prop_assert_eq!(ratio, 1.0);
        }
    }
}
