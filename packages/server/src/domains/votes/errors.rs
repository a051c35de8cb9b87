use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::common::ServerIdError;

/// Everything a vote attempt can fail with.
///
/// Display strings are user-facing except for `Internal`, whose detail is
/// only logged.
#[derive(Error, Debug)]
pub enum VoteError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("You must be signed in to vote.")]
    Unauthenticated,

    #[error("You can only vote for a server once every {cooldown_hours} hours. Please try again later.")]
    RateLimited {
        cooldown_hours: i64,
        /// When the caller may vote again, if the blocking vote is known.
        retry_at: Option<DateTime<Utc>>,
    },

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl VoteError {
    pub fn server_not_found() -> Self {
        Self::InvalidArgument("Server not found".to_string())
    }
}

impl From<ServerIdError> for VoteError {
    fn from(err: ServerIdError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}
