//! Report module - the adherence dashboard read model.

mod assembler;

pub use assembler::{
    AdherenceReport, AdherenceReportAssembler, TaskAdherence, TaskCompletionLog, TaskStatus,
};
