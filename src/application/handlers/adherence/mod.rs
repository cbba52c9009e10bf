//! Adherence report query handlers.

mod get_adherence_report;

pub use get_adherence_report::{
    GetAdherenceReportError, GetAdherenceReportHandler, GetAdherenceReportQuery,
};
