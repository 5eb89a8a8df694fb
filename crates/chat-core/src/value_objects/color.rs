//! Message display colour (`#RRGGBB`)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Display colour attached to a message or stored as a user preference
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MessageColor(String);

impl MessageColor {
    /// Grey used whenever no colour was stored
    pub const DEFAULT_HEX: &'static str = "#6b7280";

    /// Parse an explicit `#RRGGBB` colour; the value is kept as written
    pub fn parse(value: &str) -> Result<Self, InvalidColor> {
        let trimmed = value.trim();
        let digits = trimmed.strip_prefix('#').ok_or(InvalidColor)?;
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(InvalidColor);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// A value read back from a `message_color` column
    ///
    /// Stored colours are not re-validated: anything non-empty is carried
    /// through exactly as stored.
    pub fn from_stored(stored: &str) -> Option<Self> {
        (!stored.is_empty()).then(|| Self(stored.to_string()))
    }

    /// [`Self::from_stored`], falling back to the default when absent or empty
    pub fn stored_or_default(stored: Option<&str>) -> Self {
        stored.and_then(Self::from_stored).unwrap_or_default()
    }

    /// Colour as parsed or stored
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn is_default(&self) -> bool {
        self.0 == Self::DEFAULT_HEX
    }
}

impl Default for MessageColor {
    fn default() -> Self {
        Self(Self::DEFAULT_HEX.to_string())
    }
}

impl fmt::Display for MessageColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for MessageColor {
    type Error = InvalidColor;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<MessageColor> for String {
    fn from(color: MessageColor) -> Self {
        color.0
    }
}

/// Error for colours that are not `#RRGGBB`
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("colour must be in #RRGGBB form")]
pub struct InvalidColor;
