use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};

use crate::common::ServerId;

/// Moderation states. Only approved servers are listed and votable.
pub const STATUS_PENDING: &str = "pending";
pub const STATUS_APPROVED: &str = "approved";
pub const STATUS_REJECTED: &str = "rejected";

/// A listed game server, as far as voting is concerned.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Server {
    pub id: ServerId,
    pub name: String,
    pub status: String,
    pub votes_count: i64,
    pub created_at: DateTime<Utc>,
}

impl Server {
    pub fn is_approved(&self) -> bool {
        self.status == STATUS_APPROVED
    }

    /// Insert a server row. Submission and moderation live elsewhere; this
    /// exists for fixtures and seeding.
    pub async fn create(name: &str, status: &str, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO servers (name, status)
             VALUES ($1, $2)
             RETURNING id, name, status, votes_count, created_at",
        )
        .bind(name)
        .bind(status)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_id(id: ServerId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT id, name, status, votes_count, created_at
             FROM servers
             WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_approved_by_id(id: ServerId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT id, name, status, votes_count, created_at
             FROM servers
             WHERE id = $1 AND status = $2",
        )
        .bind(id)
        .bind(STATUS_APPROVED)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Atomically bump the counter of an approved server.
    ///
    /// Runs on the caller's connection so it shares the vote insert's
    /// transaction. Returns the new count, or `None` if the server is
    /// missing or not approved.
    pub async fn increment_votes(id: ServerId, conn: &mut PgConnection) -> Result<Option<i64>> {
        sqlx::query_scalar::<_, i64>(
            "UPDATE servers
             SET votes_count = votes_count + 1
             WHERE id = $1 AND status = $2
             RETURNING votes_count",
        )
        .bind(id)
        .bind(STATUS_APPROVED)
        .fetch_optional(conn)
        .await
        .map_err(Into::into)
    }
}
