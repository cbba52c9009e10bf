//! Phase gate command and query handlers.

mod change_phase_access;
mod list_phases;

pub use change_phase_access::{
    ChangePhaseAccessCommand, ChangePhaseAccessHandler, ChangePhaseAccessResult, PhaseAction,
};
pub use list_phases::{ListPhasesHandler, ListPhasesQuery};

pub(crate) use list_phases::load_patient_phases;
