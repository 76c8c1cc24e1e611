//! Configuration options for parsing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// What to do with a date or timestamp that does not match the expected
/// `MM/DD/YYYY` (or `MM/DD/YYYY hh:mm AM|PM`) pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadDatePolicy {
    /// Abort the parse with a format error.
    Raise,
    /// Replace the value with an empty string and keep going.
    #[default]
    Empty,
}

impl BadDatePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            BadDatePolicy::Raise => "raise",
            BadDatePolicy::Empty => "empty",
        }
    }
}

impl fmt::Display for BadDatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BadDatePolicy {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raise" => Ok(BadDatePolicy::Raise),
            "empty" => Ok(BadDatePolicy::Empty),
            _ => Err(ModelError::UnknownBadDatePolicy {
                value: s.to_string(),
            }),
        }
    }
}

/// Options controlling a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Handling of malformed date and timestamp values.
    pub on_bad_date: BadDatePolicy,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the whole parse on the first malformed date.
    pub fn strict() -> Self {
        Self {
            on_bad_date: BadDatePolicy::Raise,
        }
    }

    #[must_use]
    pub fn with_on_bad_date(mut self, policy: BadDatePolicy) -> Self {
        self.on_bad_date = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_empty() {
        assert_eq!(ParseOptions::default().on_bad_date, BadDatePolicy::Empty);
        assert_eq!(ParseOptions::strict().on_bad_date, BadDatePolicy::Raise);
    }

    #[test]
    fn policy_from_str_is_case_insensitive() {
        assert_eq!("RAISE".parse::<BadDatePolicy>(), Ok(BadDatePolicy::Raise));
        assert_eq!(" empty ".parse::<BadDatePolicy>(), Ok(BadDatePolicy::Empty));
        assert!(matches!(
            "ignore".parse::<BadDatePolicy>(),
            Err(ModelError::UnknownBadDatePolicy { .. })
        ));
    }

    #[test]
    fn options_deserialize_from_partial_json() {
        let options: ParseOptions =
            serde_json::from_str(r#"{"on_bad_date": "raise"}"#).expect("deserialize");
        assert_eq!(options.on_bad_date, BadDatePolicy::Raise);
        let options: ParseOptions = serde_json::from_str("{}").expect("deserialize");
        assert_eq!(options, ParseOptions::default());
    }
}
