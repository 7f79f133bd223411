//! Version addressing for registry endpoints.
//!
//! The registry accepts either a positive version number or the literal
//! `latest` wherever a version is expected; `-1` is the numeric alias the
//! REST API documents for `latest`.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Numeric alias for `latest` accepted by the registry.
pub const LATEST_VERSION: i32 = -1;

/// Either a concrete version number or the registry's current latest.
///
/// Serialized as a bare integer or the string `"latest"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionSelector {
    /// A concrete, positive version number
    Number(i32),
    /// Whatever the registry currently considers the newest version
    Latest,
}

/// Errors produced when parsing a [`VersionSelector`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VersionParseError {
    /// The input was neither `latest` nor an integer.
    #[error("Invalid version selector: {0}")]
    InvalidFormat(String),
    /// The input was an integer that cannot name a version.
    #[error("Version must be positive or -1 (latest), got {0}")]
    OutOfRange(i32),
}

impl VersionSelector {
    /// Build a selector from a raw number, mapping `-1` to [`VersionSelector::Latest`].
    pub fn from_number(n: i32) -> Result<Self, VersionParseError> {
        match n {
            LATEST_VERSION => Ok(VersionSelector::Latest),
            n if n > 0 => Ok(VersionSelector::Number(n)),
            n => Err(VersionParseError::OutOfRange(n)),
        }
    }

    /// Whether the selector addresses the registry's latest version.
    pub fn is_latest(&self) -> bool { matches!(self, VersionSelector::Latest) }
}

impl FromStr for VersionSelector {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("latest") {
            return Ok(VersionSelector::Latest);
        }
        let n: i32 =
            trimmed.parse().map_err(|_| VersionParseError::InvalidFormat(s.to_string()))?;
        Self::from_number(n)
    }
}

impl fmt::Display for VersionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionSelector::Number(n) => write!(f, "{}", n),
            VersionSelector::Latest => f.write_str("latest"),
        }
    }
}

impl Serialize for VersionSelector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            VersionSelector::Number(n) => serializer.serialize_i32(*n),
            VersionSelector::Latest => serializer.serialize_str("latest"),
        }
    }
}

impl<'de> Deserialize<'de> for VersionSelector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i32),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => VersionSelector::from_number(n).map_err(de::Error::custom),
            Raw::Text(s) => s.parse().map_err(de::Error::custom),
        }
    }
}
