//! In-memory store adapters.

mod action_plan_store;
mod patient_directory;
mod phase_access_store;

pub use action_plan_store::InMemoryActionPlanStore;
pub use patient_directory::InMemoryPatientDirectory;
pub use phase_access_store::InMemoryPhaseAccessStore;
