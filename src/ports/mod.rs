//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `Clock` - current instant and timezone policy
//! - `ActionPlanStore` - plans, tasks and the completion log
//! - `PhaseAccessStore` - sparse phase gate records with conditional writes
//! - `PatientDirectory` - patient lookups
//! - `EventPublisher` - audit events

mod action_plan_store;
mod clock;
mod event_publisher;
mod patient_directory;
mod phase_access_store;

pub use action_plan_store::ActionPlanStore;
pub use clock::Clock;
pub use event_publisher::EventPublisher;
pub use patient_directory::PatientDirectory;
pub use phase_access_store::PhaseAccessStore;
