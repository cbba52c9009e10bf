//! Task frequency as a sum type.
//!
//! Storage and the wire keep the flat shape (`frequency` tag plus optional
//! `custom_frequency_details`); `Frequency` is only built from it through
//! validation, so "details present iff custom" always holds in memory.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::weekday_set::{parse_weekdays, ScheduleWarning, WeekdaySet};
use crate::domain::foundation::ValidationError;

/// The three frequency tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyKind {
    Daily,
    Weekly,
    Custom,
}

impl FrequencyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FrequencyKind::Daily => "daily",
            FrequencyKind::Weekly => "weekly",
            FrequencyKind::Custom => "custom",
        }
    }
}

impl fmt::Display for FrequencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FrequencyKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(FrequencyKind::Daily),
            "weekly" => Ok(FrequencyKind::Weekly),
            "custom" => Ok(FrequencyKind::Custom),
            other => Err(ValidationError::invalid_format(
                "frequency",
                format!("expected daily, weekly or custom, got '{}'", other),
            )),
        }
    }
}

/// A custom weekday schedule with its source text and parse outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomSchedule {
    details: String,
    weekdays: WeekdaySet,
    warnings: Vec<ScheduleWarning>,
}

impl CustomSchedule {
    /// Parses free-text details. Blank details are rejected; details that
    /// name no weekday are accepted and produce a schedule that never fires.
    pub fn parse(details: impl Into<String>) -> Result<Self, ValidationError> {
        let details = details.into();
        if details.trim().is_empty() {
            return Err(ValidationError::empty_field("custom_frequency_details"));
        }

        let parsed = parse_weekdays(&details);
        for warning in &parsed.warnings {
            tracing::warn!(details = %details, %warning, "Custom schedule parse warning");
        }

        Ok(Self {
            details,
            weekdays: parsed.weekdays,
            warnings: parsed.warnings,
        })
    }

    pub fn details(&self) -> &str {
        &self.details
    }

    pub fn weekdays(&self) -> WeekdaySet {
        self.weekdays
    }

    pub fn warnings(&self) -> &[ScheduleWarning] {
        &self.warnings
    }
}

/// How often a task is expected to be performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FrequencyRecord", into = "FrequencyRecord")]
pub enum Frequency {
    Daily,
    Weekly,
    Custom(CustomSchedule),
}

impl Frequency {
    /// Builds a frequency from its flat parts.
    ///
    /// Whitespace-only details count as absent. Details on a daily or weekly
    /// task are a mismatch; a custom task without details is an empty field.
    pub fn from_parts(kind: FrequencyKind, details: Option<&str>) -> Result<Self, ValidationError> {
        let details = details.filter(|d| !d.trim().is_empty());

        match (kind, details) {
            (FrequencyKind::Daily, None) => Ok(Frequency::Daily),
            (FrequencyKind::Weekly, None) => Ok(Frequency::Weekly),
            (FrequencyKind::Custom, Some(details)) => {
                Ok(Frequency::Custom(CustomSchedule::parse(details)?))
            }
            (FrequencyKind::Custom, None) => {
                Err(ValidationError::empty_field("custom_frequency_details"))
            }
            (kind, Some(_)) => Err(ValidationError::frequency_mismatch(
                kind.as_str(),
                "custom_frequency_details is only allowed for custom frequency",
            )),
        }
    }

    pub fn kind(&self) -> FrequencyKind {
        match self {
            Frequency::Daily => FrequencyKind::Daily,
            Frequency::Weekly => FrequencyKind::Weekly,
            Frequency::Custom(_) => FrequencyKind::Custom,
        }
    }

    /// Raw details text, present only for custom schedules.
    pub fn custom_details(&self) -> Option<&str> {
        match self {
            Frequency::Custom(schedule) => Some(schedule.details()),
            _ => None,
        }
    }

    /// Parse warnings; always empty for daily and weekly.
    pub fn warnings(&self) -> &[ScheduleWarning] {
        match self {
            Frequency::Custom(schedule) => schedule.warnings(),
            _ => &[],
        }
    }
}

/// Flat persisted/wire form of a frequency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyRecord {
    pub frequency: FrequencyKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_frequency_details: Option<String>,
}

impl TryFrom<FrequencyRecord> for Frequency {
    type Error = ValidationError;

    fn try_from(record: FrequencyRecord) -> Result<Self, Self::Error> {
        Frequency::from_parts(record.frequency, record.custom_frequency_details.as_deref())
    }
}

impl From<Frequency> for FrequencyRecord {
    fn from(frequency: Frequency) -> Self {
        Self {
            frequency: frequency.kind(),
            custom_frequency_details: frequency.custom_details().map(str::to_string),
        }
    }
}
