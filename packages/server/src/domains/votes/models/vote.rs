use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};

use crate::common::{ServerId, UserId, VoteId};

/// An accepted vote. Rows are never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VoteRecord {
    pub id: VoteId,
    pub user_id: UserId,
    pub server_id: ServerId,
    pub voted_at: DateTime<Utc>,
    /// End of this vote's cooldown window (exclusive).
    pub cooldown_ends_at: DateTime<Utc>,
}

/// A vote about to be inserted.
#[derive(Debug, Clone)]
pub struct NewVote {
    pub user_id: UserId,
    pub server_id: ServerId,
    pub voted_at: DateTime<Utc>,
    pub cooldown_ends_at: DateTime<Utc>,
}

impl NewVote {
    pub fn new(user_id: UserId, server_id: ServerId, now: DateTime<Utc>, cooldown: Duration) -> Self {
        Self {
            user_id,
            server_id,
            voted_at: now,
            cooldown_ends_at: now + cooldown,
        }
    }

    /// Whether this vote's window overlaps an existing vote for the same pair.
    pub fn conflicts_with(&self, other: &VoteRecord) -> bool {
        self.user_id == other.user_id
            && self.server_id == other.server_id
            && self.voted_at < other.cooldown_ends_at
            && other.voted_at < self.cooldown_ends_at
    }
}

impl VoteRecord {
    /// Most recent vote by `user_id` for `server_id` cast after `since`.
    pub async fn find_latest_since(
        user_id: UserId,
        server_id: ServerId,
        since: DateTime<Utc>,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT id, user_id, server_id, voted_at, cooldown_ends_at
             FROM votes
             WHERE user_id = $1 AND server_id = $2 AND voted_at > $3
             ORDER BY voted_at DESC
             LIMIT 1",
        )
        .bind(user_id)
        .bind(server_id)
        .bind(since)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn count_for_pair(user_id: UserId, server_id: ServerId, pool: &PgPool) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM votes WHERE user_id = $1 AND server_id = $2",
        )
        .bind(user_id)
        .bind(server_id)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Insert on the caller's connection (normally inside a transaction).
    ///
    /// Returns the raw sqlx error so the caller can tell constraint
    /// violations apart from infrastructure failures.
    pub async fn insert(vote: &NewVote, conn: &mut PgConnection) -> sqlx::Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO votes (user_id, server_id, voted_at, cooldown_ends_at)
             VALUES ($1, $2, $3, $4)
             RETURNING id, user_id, server_id, voted_at, cooldown_ends_at",
        )
        .bind(vote.user_id)
        .bind(vote.server_id)
        .bind(vote.voted_at)
        .bind(vote.cooldown_ends_at)
        .fetch_one(conn)
        .await
    }
}
