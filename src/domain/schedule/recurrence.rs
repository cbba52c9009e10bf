//! Recurrence engine: expands a frequency over a date window.
//!
//! Pure and clock-free. The caller resolves `as_of` (usually "today" in the
//! configured timezone) before asking for occurrences.

use chrono::{Datelike, Days, NaiveDate};
use std::iter::FusedIterator;

use super::frequency::Frequency;
use super::weekday_set::WeekdaySet;
use crate::domain::foundation::ValidationError;

/// Expands schedules into expected occurrence dates.
pub struct RecurrenceEngine;

impl RecurrenceEngine {
    /// Expected occurrence dates of `frequency` within `[start_date, as_of]`.
    ///
    /// # Errors
    ///
    /// `InvalidWindow` when `as_of` precedes `start_date`, for every frequency.
    pub fn expected_occurrences(
        frequency: &Frequency,
        start_date: NaiveDate,
        as_of: NaiveDate,
    ) -> Result<Occurrences, ValidationError> {
        if as_of < start_date {
            return Err(ValidationError::invalid_window(start_date, as_of));
        }

        let rule = match frequency {
            Frequency::Daily => Rule::EveryDays(1),
            Frequency::Weekly => Rule::EveryDays(7),
            Frequency::Custom(schedule) => Rule::OnWeekdays(schedule.weekdays()),
        };

        Ok(Occurrences {
            rule,
            start_date,
            end_date: as_of,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    EveryDays(u64),
    OnWeekdays(WeekdaySet),
}

/// Finite, ordered and restartable sequence of expected dates.
///
/// Dates are produced lazily; each call to [`Occurrences::iter`] starts
/// again from the window start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrences {
    rule: Rule,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl Occurrences {
    pub fn iter(&self) -> OccurrenceIter {
        let next = match self.rule {
            Rule::OnWeekdays(set) if set.is_empty() => None,
            _ => Some(self.start_date),
        };
        OccurrenceIter {
            rule: self.rule,
            next,
            end_date: self.end_date,
        }
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Number of expected dates in the window.
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Whether `date` is one of the expected dates.
    pub fn contains(&self, date: NaiveDate) -> bool {
        if date < self.start_date || date > self.end_date {
            return false;
        }
        match self.rule {
            Rule::EveryDays(step) => {
                let offset = (date - self.start_date).num_days() as u64;
                offset % step == 0
            }
            Rule::OnWeekdays(set) => set.contains(date.weekday()),
        }
    }
}

impl<'a> IntoIterator for &'a Occurrences {
    type Item = NaiveDate;
    type IntoIter = OccurrenceIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Occurrences {
    type Item = NaiveDate;
    type IntoIter = OccurrenceIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over expected dates, ascending.
#[derive(Debug, Clone)]
pub struct OccurrenceIter {
    rule: Rule,
    next: Option<NaiveDate>,
    end_date: NaiveDate,
}

impl OccurrenceIter {
    fn advance(&self, date: NaiveDate, days: u64) -> Option<NaiveDate> {
        date.checked_add_days(Days::new(days))
            .filter(|d| *d <= self.end_date)
    }
}

impl Iterator for OccurrenceIter {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let current = self.next.filter(|d| *d <= self.end_date)?;
            match self.rule {
                Rule::EveryDays(step) => {
                    self.next = self.advance(current, step);
                    return Some(current);
                }
                Rule::OnWeekdays(set) => {
                    self.next = self.advance(current, 1);
                    if set.contains(current.weekday()) {
                        return Some(current);
                    }
                }
            }
        }
    }
}

impl FusedIterator for OccurrenceIter {}
