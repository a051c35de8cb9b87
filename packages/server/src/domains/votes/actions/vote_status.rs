use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::common::{ServerId, UserId};
use crate::domains::votes::errors::VoteError;
use crate::kernel::ServerDeps;

/// Whether a user may vote for a server right now, for the UI countdown.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VoteStatus {
    pub server_id: ServerId,
    pub can_vote: bool,
    pub last_voted_at: Option<DateTime<Utc>>,
    pub next_vote_at: Option<DateTime<Utc>>,
    pub votes_count: i64,
}

pub async fn vote_status(
    user_id: UserId,
    server_id: ServerId,
    now: DateTime<Utc>,
    deps: &ServerDeps,
) -> Result<VoteStatus, VoteError> {
    let store = deps.vote_store.as_ref();

    let server = store
        .find_server(server_id)
        .await?
        .ok_or_else(VoteError::server_not_found)?;

    let recent = store
        .find_recent_vote(user_id, server_id, now - deps.vote_cooldown)
        .await?;

    Ok(match recent {
        Some(vote) => VoteStatus {
            server_id,
            can_vote: false,
            last_voted_at: Some(vote.voted_at),
            next_vote_at: Some(vote.voted_at + deps.vote_cooldown),
            votes_count: server.votes_count,
        },
        None => VoteStatus {
            server_id,
            can_vote: true,
            last_voted_at: None,
            next_vote_at: None,
            votes_count: server.votes_count,
        },
    })
}
