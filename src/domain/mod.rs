//! Domain layer - pure business logic with no I/O.

pub mod action_plan;
pub mod adherence;
pub mod foundation;
pub mod phase;
pub mod report;
pub mod schedule;
