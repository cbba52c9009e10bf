//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers take an explicit `CommandMetadata` naming the acting
//! therapist; query handlers never mutate.

mod audit;
pub mod handlers;
mod phase_locks;
mod store_guard;

pub use handlers::{
    AddTaskCommand, AddTaskHandler, ChangePhaseAccessCommand, ChangePhaseAccessHandler,
    ChangePhaseAccessResult, CreateActionPlanCommand, CreateActionPlanHandler,
    GetAdherenceReportError, GetAdherenceReportHandler, GetAdherenceReportQuery,
    ListPhasesHandler, ListPhasesQuery, PhaseAction, RecordCompletionCommand,
    RecordCompletionHandler,
};
pub(crate) use audit::publish_committed;
pub use phase_locks::PhaseKeyLocks;
pub use store_guard::StoreGuard;
