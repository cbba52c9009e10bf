//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, errors and event plumbing shared by
//! the schedule, adherence and phase-gating modules.

mod command;
mod errors;
mod events;
mod ids;
mod state_machine;
mod timestamp;

pub use command::CommandMetadata;
pub use errors::{DomainError, ErrorCode, ErrorKind, ValidationError};
pub use events::{
    domain_event, DomainEvent, EventEnvelope, EventId, EventMetadata, SerializableDomainEvent,
};
pub use ids::{ActionPlanId, CompletionId, PatientId, TaskId, TherapistId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
