//! PostgreSQL adapters - Database implementations for the store ports.
//!
//! - `PostgresActionPlanStore` - Plans, tasks and the append-only completion log
//! - `PostgresPhaseAccessStore` - Phase access with compare-and-swap writes
//! - `PostgresPatientDirectory` - Patient lookups

mod action_plan_store;
mod patient_directory;
mod phase_access_store;

pub use action_plan_store::PostgresActionPlanStore;
pub use patient_directory::PostgresPatientDirectory;
pub use phase_access_store::PostgresPhaseAccessStore;

use crate::domain::foundation::DomainError;

/// Wraps a sqlx failure with the operation that hit it.
fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| DomainError::database(format!("{}: {}", context, e))
}

/// Maps rows to domain values, logging and dropping the ones that fail.
///
/// Listing queries feed the dashboard; a single row that no longer passes
/// domain validation must not fail the whole read.
fn skip_malformed<R, T>(
    rows: &[R],
    what: &'static str,
    parse: impl Fn(&R) -> Result<T, DomainError>,
) -> Vec<T> {
    rows.iter()
        .enumerate()
        .filter_map(|(index, row)| match parse(row) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(row = index, kind = what, error = %err, "Skipping malformed row");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ErrorCode, ValidationError};
    use crate::domain::schedule::{Frequency, FrequencyKind};

    #[test]
    fn malformed_rows_are_dropped_and_the_rest_kept() {
        // (frequency, details) as stored; the weekly row carries stray details.
        let rows = vec![
            (FrequencyKind::Daily, None),
            (FrequencyKind::Weekly, Some("Mon")),
            (FrequencyKind::Custom, Some("Seg, Qua")),
        ];

        let parsed = skip_malformed(&rows, "task", |(kind, details)| {
            Ok(Frequency::from_parts(*kind, *details)?)
        });

        let kinds: Vec<FrequencyKind> = parsed.iter().map(Frequency::kind).collect();
        assert_eq!(kinds, vec![FrequencyKind::Daily, FrequencyKind::Custom]);
    }

    #[test]
    fn all_valid_rows_pass_through() {
        let rows = vec![1, 2, 3];
        let parsed = skip_malformed(&rows, "number", |n| {
            if *n > 0 {
                Ok(*n * 10)
            } else {
                Err(ValidationError::empty_field("n").into())
            }
        });
        assert_eq!(parsed, vec![10, 20, 30]);
    }

    #[test]
    fn db_error_keeps_context() {
        let err = db_error("Failed to list tasks")(sqlx::Error::RowNotFound);
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(err.message.starts_with("Failed to list tasks"));
    }
}
