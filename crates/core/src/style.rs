//! The target tone of a transformation.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The tone category requested for the rewritten text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Casual,
    Formal,
}

impl Style {
    pub const ALL: [Style; 2] = [Style::Casual, Style::Formal];

    /// Canonical lowercase name, as stored and sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Style::Casual => "casual",
            Style::Formal => "formal",
        }
    }
}

impl std::fmt::Display for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known style.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown style '{0}': expected 'casual' or 'formal'")]
pub struct ParseStyleError(pub String);

impl FromStr for Style {
    type Err = ParseStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "casual" => Ok(Style::Casual),
            "formal" => Ok(Style::Formal),
            _ => Err(ParseStyleError(s.to_string())),
        }
    }
}
