//! Schedule module - task frequencies and their expansion into dates.

mod frequency;
mod recurrence;
mod weekday_set;

pub use frequency::{CustomSchedule, Frequency, FrequencyKind, FrequencyRecord};
pub use recurrence::{OccurrenceIter, Occurrences, RecurrenceEngine};
pub use weekday_set::{parse_weekdays, weekday_index, ParsedWeekdays, ScheduleWarning, WeekdaySet};
