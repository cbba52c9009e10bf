//! Clock port - current instant and timezone policy.
//!
//! Nothing in the domain reads the system clock; handlers ask this port.

use chrono::{FixedOffset, NaiveDate};

use crate::domain::foundation::Timestamp;

/// Source of "now" and of the offset used to turn instants into dates.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> Timestamp;

    /// UTC offset that defines calendar days for adherence.
    fn offset(&self) -> FixedOffset;

    /// Today's date in the configured offset.
    fn today(&self) -> NaiveDate {
        self.now().date_at(self.offset())
    }
}
