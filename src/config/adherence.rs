//! Adherence engine settings: timezone policy and collaborator timeouts.

use chrono::FixedOffset;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

const MAX_OFFSET_MINUTES: i32 = 14 * 60;

#[derive(Debug, Clone, Deserialize)]
pub struct AdherenceConfig {
    /// Offset used to turn "now" into today's date. Defaults to UTC.
    #[serde(default)]
    pub utc_offset_minutes: i32,

    /// Upper bound on every store and directory call.
    #[serde(default = "default_store_timeout")]
    pub store_timeout_ms: u64,
}

impl AdherenceConfig {
    pub fn utc_offset(&self) -> Result<FixedOffset, ValidationError> {
        if self.utc_offset_minutes.abs() > MAX_OFFSET_MINUTES {
            return Err(ValidationError::InvalidUtcOffset(self.utc_offset_minutes));
        }
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .ok_or(ValidationError::InvalidUtcOffset(self.utc_offset_minutes))
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.utc_offset()?;
        if self.store_timeout_ms == 0 || self.store_timeout_ms > 60_000 {
            return Err(ValidationError::InvalidStoreTimeout(self.store_timeout_ms));
        }
        Ok(())
    }
}

impl Default for AdherenceConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            store_timeout_ms: default_store_timeout(),
        }
    }
}

fn default_store_timeout() -> u64 {
    5_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_utc_and_five_seconds() {
        let config = AdherenceConfig::default();
        assert_eq!(config.utc_offset().unwrap().local_minus_utc(), 0);
        assert_eq!(config.store_timeout(), Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn brasilia_offset_is_accepted() {
        let config = AdherenceConfig {
            utc_offset_minutes: -180,
            ..Default::default()
        };
        assert_eq!(config.utc_offset().unwrap().local_minus_utc(), -3 * 3600);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let config = AdherenceConfig {
            utc_offset_minutes: 15 * 60,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidUtcOffset(900)));

        let config = AdherenceConfig {
            store_timeout_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidStoreTimeout(0)));
    }
}
