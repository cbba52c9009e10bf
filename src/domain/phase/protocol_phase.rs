//! The fixed five-phase protocol enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// One stage of the reprocessing protocol, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtocolPhase {
    Chronological,
    Somatic,
    Thematic,
    Future,
    Potentiation,
}

impl ProtocolPhase {
    /// All phases in canonical order.
    pub const ALL: [ProtocolPhase; 5] = [
        ProtocolPhase::Chronological,
        ProtocolPhase::Somatic,
        ProtocolPhase::Thematic,
        ProtocolPhase::Future,
        ProtocolPhase::Potentiation,
    ];

    /// Zero-based position in the canonical order.
    pub fn order_index(&self) -> usize {
        match self {
            ProtocolPhase::Chronological => 0,
            ProtocolPhase::Somatic => 1,
            ProtocolPhase::Thematic => 2,
            ProtocolPhase::Future => 3,
            ProtocolPhase::Potentiation => 4,
        }
    }

    /// Stable token used in storage and URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProtocolPhase::Chronological => "chronological",
            ProtocolPhase::Somatic => "somatic",
            ProtocolPhase::Thematic => "thematic",
            ProtocolPhase::Future => "future",
            ProtocolPhase::Potentiation => "potentiation",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProtocolPhase::Chronological => "Chronological",
            ProtocolPhase::Somatic => "Somatic",
            ProtocolPhase::Thematic => "Thematic",
            ProtocolPhase::Future => "Future",
            ProtocolPhase::Potentiation => "Potentiation",
        }
    }
}

impl fmt::Display for ProtocolPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProtocolPhase {
    type Err = ValidationError;

    /// Accepts English tokens and the Portuguese ones used by legacy records
    /// (`cronologico`, `somatico`, `tematico`, `futuro`, `potencializacao`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token: String = s
            .trim()
            .chars()
            .flat_map(char::to_lowercase)
            .map(|c| match c {
                'ô' | 'ó' => 'o',
                'á' | 'ã' => 'a',
                'ç' => 'c',
                other => other,
            })
            .collect();

        match token.as_str() {
            "chronological" | "cronologico" => Ok(ProtocolPhase::Chronological),
            "somatic" | "somatico" => Ok(ProtocolPhase::Somatic),
            "thematic" | "tematico" => Ok(ProtocolPhase::Thematic),
            "future" | "futuro" => Ok(ProtocolPhase::Future),
            "potentiation" | "potencializacao" => Ok(ProtocolPhase::Potentiation),
            _ => Err(ValidationError::unknown_phase(s.trim())),
        }
    }
}
