//! Row identifier - the store-assigned, monotonically increasing primary key
//!
//! Users, conversations, groups and messages are all keyed by `SERIAL`/`BIGSERIAL`
//! columns. Higher values were inserted later, which is what makes the id usable
//! as the final tie-breaker when ordering messages and timeline entries.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Store-assigned row identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RowId(i64);

impl RowId {
    /// Create a new RowId from a raw i64 value
    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner i64 value
    #[inline]
    pub const fn into_inner(self) -> i64 {
        self.0
    }

    /// Rows are numbered from 1, anything else never came from the store
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.0 > 0
    }

    /// Parse from string representation
    pub fn parse(s: &str) -> Result<Self, RowIdParseError> {
        s.trim()
            .parse::<i64>()
            .map(RowId)
            .map_err(|_| RowIdParseError::InvalidFormat)
    }
}

/// Error when parsing a RowId from string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RowIdParseError {
    #[error("invalid row id format")]
    InvalidFormat,
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RowId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<i32> for RowId {
    fn from(id: i32) -> Self {
        Self(i64::from(id))
    }
}

impl From<RowId> for i64 {
    fn from(id: RowId) -> Self {
        id.0
    }
}

impl std::str::FromStr for RowId {
    type Err = RowIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RowId::parse(s)
    }
}

// Serialized as a plain JSON number, the ids stay well inside 2^53
impl Serialize for RowId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(self.0)
    }
}

// Deserialize from number or numeric string (session stores hand us either)
impl<'de> Deserialize<'de> for RowId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct RowIdVisitor;

        impl Visitor<'_> for RowIdVisitor {
            type Value = RowId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an integer or numeric string row id")
            }

            fn visit_i64<E>(self, value: i64) -> Result<RowId, E>
            where
                E: de::Error,
            {
                Ok(RowId(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<RowId, E>
            where
                E: de::Error,
            {
                i64::try_from(value)
                    .map(RowId)
                    .map_err(|_| de::Error::custom("row id out of range"))
            }

            fn visit_str<E>(self, value: &str) -> Result<RowId, E>
            where
                E: de::Error,
            {
                RowId::parse(value).map_err(|_| de::Error::custom("invalid row id string"))
            }
        }

        deserializer.deserialize_any(RowIdVisitor)
    }
}
