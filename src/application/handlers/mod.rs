//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod action_plan;
pub mod adherence;
pub mod phase;

pub use action_plan::{
    AddTaskCommand, AddTaskHandler, CreateActionPlanCommand, CreateActionPlanHandler,
    RecordCompletionCommand, RecordCompletionHandler,
};
pub use adherence::{GetAdherenceReportError, GetAdherenceReportHandler, GetAdherenceReportQuery};
pub use phase::{
    ChangePhaseAccessCommand, ChangePhaseAccessHandler, ChangePhaseAccessResult, ListPhasesHandler,
    ListPhasesQuery, PhaseAction,
};
