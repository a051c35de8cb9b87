//! Typed ids for the entities the vote service touches.
//!
//! Users and votes are keyed by UUID. Servers keep the directory's integer
//! primary key, so `ServerId` is its own newtype with input validation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{self, Display};
use thiserror::Error;

pub use super::id::Id;

/// Marker type for authenticated users (the identity provider's `sub`).
pub struct User;

/// Marker type for vote rows.
pub struct Vote;

pub type UserId = Id<User>;
pub type VoteId = Id<Vote>;

/// Why a client-supplied server id was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServerIdError {
    #[error("serverId is required")]
    Missing,

    #[error("serverId must be a positive integer")]
    Invalid,
}

/// Primary key of a listed game server. Always positive.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct ServerId(i64);

impl ServerId {
    pub fn new(raw: i64) -> Result<Self, ServerIdError> {
        if raw > 0 {
            Ok(Self(raw))
        } else {
            Err(ServerIdError::Invalid)
        }
    }

    /// Accepts a JSON integer or a string of decimal digits.
    ///
    /// `null` counts as missing. Floats, booleans, signs and whitespace are
    /// rejected.
    pub fn from_json(value: Option<&Value>) -> Result<Self, ServerIdError> {
        match value {
            None | Some(Value::Null) => Err(ServerIdError::Missing),
            Some(Value::Number(n)) => n
                .as_i64()
                .ok_or(ServerIdError::Invalid)
                .and_then(Self::new),
            Some(Value::String(s)) => Self::parse(s),
            Some(_) => Err(ServerIdError::Invalid),
        }
    }

    /// Parses a query-string or path value.
    pub fn parse(s: &str) -> Result<Self, ServerIdError> {
        if s.is_empty() {
            return Err(ServerIdError::Missing);
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ServerIdError::Invalid);
        }
        s.parse::<i64>()
            .map_err(|_| ServerIdError::Invalid)
            .and_then(Self::new)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}
