//! Weekday sets and free-text weekday parsing for custom schedules.
//!
//! Indices follow the Sunday-first convention: 0 = Sunday … 6 = Saturday.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Set of weekdays stored as a 7-bit mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    /// No weekdays.
    pub const EMPTY: Self = Self(0);

    /// Every day of the week.
    pub const ALL: Self = Self(0b111_1111);

    /// Builds a set from Sunday-first indices, ignoring anything above 6.
    pub fn from_indices(indices: impl IntoIterator<Item = u8>) -> Self {
        let mut set = Self::EMPTY;
        for index in indices {
            set.insert_index(index);
        }
        set
    }

    /// Adds a weekday by index. Returns false for indices outside 0..=6.
    pub fn insert_index(&mut self, index: u8) -> bool {
        if index > 6 {
            return false;
        }
        self.0 |= 1 << index;
        true
    }

    pub fn insert(&mut self, weekday: Weekday) {
        self.0 |= 1 << weekday_index(weekday);
    }

    pub fn contains(&self, weekday: Weekday) -> bool {
        self.contains_index(weekday_index(weekday))
    }

    pub fn contains_index(&self, index: u8) -> bool {
        index <= 6 && self.0 & (1 << index) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Member indices in ascending order.
    pub fn indices(&self) -> Vec<u8> {
        (0..7).filter(|i| self.contains_index(*i)).collect()
    }
}

impl fmt::Display for WeekdaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.indices().into_iter().map(short_name).collect();
        write!(f, "{}", names.join(","))
    }
}

/// Sunday-first index of a chrono weekday.
pub fn weekday_index(weekday: Weekday) -> u8 {
    weekday.num_days_from_sunday() as u8
}

fn short_name(index: u8) -> &'static str {
    match index {
        0 => "sun",
        1 => "mon",
        2 => "tue",
        3 => "wed",
        4 => "thu",
        5 => "fri",
        _ => "sat",
    }
}

/// Non-fatal problem found while interpreting custom schedule details.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduleWarning {
    /// A token that names no weekday; it was dropped.
    UnrecognizedToken { token: String },
    /// Nothing in the details named a weekday, so the schedule never fires.
    NoWeekdays,
}

impl fmt::Display for ScheduleWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleWarning::UnrecognizedToken { token } => {
                write!(f, "unrecognized weekday token '{}'", token)
            }
            ScheduleWarning::NoWeekdays => write!(f, "no weekdays recognized"),
        }
    }
}

/// Outcome of parsing free-text weekday details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedWeekdays {
    pub weekdays: WeekdaySet,
    pub warnings: Vec<ScheduleWarning>,
}

/// Parses details such as "Mon, Wed, Fri" or "Seg, Qua, Sex".
///
/// Never fails: unknown tokens are dropped and reported as warnings.
pub fn parse_weekdays(details: &str) -> ParsedWeekdays {
    let mut weekdays = WeekdaySet::EMPTY;
    let mut warnings = Vec::new();

    let tokens = details
        .split(|c: char| c == ',' || c == ';' || c == '/' || c.is_whitespace())
        .filter(|t| !t.is_empty());

    for raw in tokens {
        let token = normalize_token(raw);
        if token.is_empty() || is_connective(&token) {
            continue;
        }
        match token_weekday(&token) {
            Some(index) => {
                weekdays.insert_index(index);
            }
            None => warnings.push(ScheduleWarning::UnrecognizedToken {
                token: raw.to_string(),
            }),
        }
    }

    if weekdays.is_empty() {
        warnings.push(ScheduleWarning::NoWeekdays);
    }

    ParsedWeekdays { weekdays, warnings }
}

/// Lowercases, folds Portuguese accents and drops trailing dots and "-feira".
fn normalize_token(raw: &str) -> String {
    let folded: String = raw
        .trim_end_matches('.')
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' => 'a',
            'é' | 'ê' => 'e',
            'í' => 'i',
            'ó' | 'ô' | 'õ' => 'o',
            'ú' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect();

    folded
        .strip_suffix("-feira")
        .map(str::to_string)
        .unwrap_or(folded)
}

fn is_connective(token: &str) -> bool {
    matches!(token, "e" | "and" | "&" | "feira")
}

fn token_weekday(token: &str) -> Option<u8> {
    let index = match token {
        "0" | "su" | "sun" | "sunday" | "dom" | "domingo" => 0,
        "1" | "mo" | "mon" | "monday" | "seg" | "segunda" => 1,
        "2" | "tu" | "tue" | "tues" | "tuesday" | "ter" | "terca" => 2,
        "3" | "we" | "wed" | "wednesday" | "qua" | "quarta" => 3,
        "4" | "th" | "thu" | "thur" | "thurs" | "thursday" | "qui" | "quinta" => 4,
        "5" | "fr" | "fri" | "friday" | "sex" | "sexta" => 5,
        "6" | "sa" | "sat" | "saturday" | "sab" | "sabado" => 6,
        _ => return None,
    };
    Some(index)
}
