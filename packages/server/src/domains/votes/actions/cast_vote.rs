//! Vote admission.
//!
//! The recency lookup is a fast path only. Two concurrent requests can both
//! miss it; the store's constraint picks one winner and the loser is
//! reported as rate limited, not as a failure.

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::common::{ServerId, UserId};
use crate::domains::votes::errors::VoteError;
use crate::domains::votes::models::{NewVote, VoteRecord};
use crate::kernel::{RecordOutcome, ServerDeps};

/// What an accepted vote produced.
#[derive(Debug, Clone)]
pub struct VoteReceipt {
    pub vote: VoteRecord,
    /// Server's counter after this vote
    pub votes_count: i64,
}

/// Admit or reject a vote by `user_id` for `server_id` at `now`.
pub async fn cast_vote(
    user_id: UserId,
    server_id: ServerId,
    now: DateTime<Utc>,
    deps: &ServerDeps,
) -> Result<VoteReceipt, VoteError> {
    let cooldown = deps.vote_cooldown;
    let cooldown_hours = deps.vote_cooldown_hours();
    let store = deps.vote_store.as_ref();

    if let Some(previous) = store
        .find_recent_vote(user_id, server_id, now - cooldown)
        .await
        .map_err(|e| internal(e, user_id, server_id))?
    {
        let retry_at = previous.voted_at + cooldown;
        debug!(
            user_id = %user_id,
            server_id = %server_id,
            retry_at = %retry_at,
            "Vote rejected: cooldown active"
        );
        return Err(VoteError::RateLimited {
            cooldown_hours,
            retry_at: Some(retry_at),
        });
    }

    let outcome = store
        .record_vote(NewVote::new(user_id, server_id, now, cooldown))
        .await
        .map_err(|e| internal(e, user_id, server_id))?;

    match outcome {
        RecordOutcome::Recorded { vote, votes_count } => {
            info!(
                user_id = %user_id,
                server_id = %server_id,
                vote_id = %vote.id,
                votes_count = votes_count,
                "Vote recorded"
            );
            Ok(VoteReceipt { vote, votes_count })
        }
        RecordOutcome::Duplicate => {
            warn!(
                user_id = %user_id,
                server_id = %server_id,
                "Vote lost race to a concurrent vote"
            );
            Err(VoteError::RateLimited {
                cooldown_hours,
                retry_at: None,
            })
        }
        RecordOutcome::UnknownServer => {
            debug!(server_id = %server_id, "Vote rejected: unknown server");
            Err(VoteError::server_not_found())
        }
    }
}

fn internal(err: anyhow::Error, user_id: UserId, server_id: ServerId) -> VoteError {
    error!(
        user_id = %user_id,
        server_id = %server_id,
        error = %err,
        "Vote store failure"
    );
    VoteError::Internal(err)
}
