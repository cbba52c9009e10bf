//! Shared application state and handler construction.

use std::sync::Arc;

use crate::application::{
    AddTaskHandler, ChangePhaseAccessHandler, CreateActionPlanHandler, GetAdherenceReportHandler,
    ListPhasesHandler, PhaseKeyLocks, RecordCompletionHandler, StoreGuard,
};
use crate::ports::{ActionPlanStore, Clock, EventPublisher, PatientDirectory, PhaseAccessStore};

/// Shared application state containing all dependencies.
#[derive(Clone)]
pub struct AppState {
    pub patients: Arc<dyn PatientDirectory>,
    pub action_plans: Arc<dyn ActionPlanStore>,
    pub phase_access: Arc<dyn PhaseAccessStore>,
    pub event_publisher: Arc<dyn EventPublisher>,
    pub clock: Arc<dyn Clock>,
    pub phase_locks: Arc<PhaseKeyLocks>,
    pub store_guard: StoreGuard,
}

impl AppState {
    pub fn new(
        patients: Arc<dyn PatientDirectory>,
        action_plans: Arc<dyn ActionPlanStore>,
        phase_access: Arc<dyn PhaseAccessStore>,
        event_publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
        store_guard: StoreGuard,
    ) -> Self {
        Self {
            patients,
            action_plans,
            phase_access,
            event_publisher,
            clock,
            phase_locks: Arc::new(PhaseKeyLocks::new()),
            store_guard,
        }
    }

    pub fn change_phase_access_handler(&self) -> ChangePhaseAccessHandler {
        ChangePhaseAccessHandler::new(
            self.patients.clone(),
            self.phase_access.clone(),
            self.event_publisher.clone(),
            self.clock.clone(),
            self.phase_locks.clone(),
            self.store_guard,
        )
    }

    pub fn list_phases_handler(&self) -> ListPhasesHandler {
        ListPhasesHandler::new(
            self.patients.clone(),
            self.phase_access.clone(),
            self.store_guard,
        )
    }

    pub fn adherence_report_handler(&self) -> GetAdherenceReportHandler {
        GetAdherenceReportHandler::new(
            self.patients.clone(),
            self.action_plans.clone(),
            self.phase_access.clone(),
            self.clock.clone(),
            self.store_guard,
        )
    }

    pub fn create_action_plan_handler(&self) -> CreateActionPlanHandler {
        CreateActionPlanHandler::new(
            self.patients.clone(),
            self.action_plans.clone(),
            self.event_publisher.clone(),
            self.clock.clone(),
            self.store_guard,
        )
    }

    pub fn add_task_handler(&self) -> AddTaskHandler {
        AddTaskHandler::new(
            self.action_plans.clone(),
            self.event_publisher.clone(),
            self.clock.clone(),
            self.store_guard,
        )
    }

    pub fn record_completion_handler(&self) -> RecordCompletionHandler {
        RecordCompletionHandler::new(
            self.action_plans.clone(),
            self.event_publisher.clone(),
            self.clock.clone(),
            self.store_guard,
        )
    }
}
