//! Adherence module - how faithfully a patient completes their tasks.

mod calculator;
mod ratio;

pub use calculator::{AdherenceCalculator, AdherenceSummary, PlanAdherence};
pub use ratio::AdherenceRatio;
