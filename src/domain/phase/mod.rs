//! Phase gate - which protocol phases a patient may access.

mod access;
mod errors;
mod events;
mod protocol_phase;

pub use access::{
    PatientPhases, PhaseAccess, PhaseAccessRecord, PhaseState, PhaseStatus, PhaseTransition,
};
pub use errors::PhaseGateError;
pub use events::{PhaseLockedEvent, PhaseUnlockedEvent};
pub use protocol_phase::ProtocolPhase;
