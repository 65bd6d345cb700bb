//! User ID - opaque identifier of an authenticated principal
//!
//! The auth service hands out either numeric or string identifiers. The wire
//! form is kept as-is: `1` and `"1"` are two different users.

use crate::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Identifier of a user, agent, or admin
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UserId {
    /// Integer identifier
    Number(i64),
    /// String identifier (never empty)
    Text(String),
}

impl UserId {
    /// Create a text identifier, rejecting blank values
    pub fn text(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::EmptyIdentifier);
        }
        Ok(Self::Text(value))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self::Number(id)
    }
}

impl TryFrom<&str> for UserId {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::text(value)
    }
}

impl TryFrom<String> for UserId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::text(value)
    }
}

// Serialize back in the form it was received
impl Serialize for UserId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Number(n) => serializer.serialize_i64(*n),
            Self::Text(s) => serializer.serialize_str(s),
        }
    }
}

// Deserialize from string or integer
impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct UserIdVisitor;

        impl Visitor<'_> for UserIdVisitor {
            type Value = UserId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a non-empty string or an integer user ID")
            }

            fn visit_i64<E>(self, value: i64) -> Result<UserId, E>
            where
                E: de::Error,
            {
                Ok(UserId::Number(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<UserId, E>
            where
                E: de::Error,
            {
                i64::try_from(value)
                    .map(UserId::Number)
                    .map_err(|_| E::custom(DomainError::InvalidIdentifier(value.to_string())))
            }

            fn visit_str<E>(self, value: &str) -> Result<UserId, E>
            where
                E: de::Error,
            {
                UserId::text(value).map_err(E::custom)
            }

            fn visit_string<E>(self, value: String) -> Result<UserId, E>
            where
                E: de::Error,
            {
                UserId::text(value).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(UserIdVisitor)
    }
}
