//! PostgreSQL-backed vote store.
//!
//! Uniqueness is enforced by the `votes_one_per_cooldown` exclusion
//! constraint; this module only translates its violations.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, warn};

use crate::common::{ServerId, UserId};
use crate::domains::servers::Server;
use crate::domains::votes::models::{NewVote, VoteRecord};
use crate::kernel::{BaseVoteStore, RecordOutcome};

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const EXCLUSION_VIOLATION: &str = "23P01";

pub struct PostgresVoteStore {
    pool: PgPool,
}

impl PostgresVoteStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Map constraint violations on the vote insert to expected outcomes.
/// Anything else is an infrastructure failure.
fn classify_insert_error(err: &sqlx::Error) -> Option<RecordOutcome> {
    let code = err.as_database_error()?.code()?;
    match code.as_ref() {
        EXCLUSION_VIOLATION | UNIQUE_VIOLATION => Some(RecordOutcome::Duplicate),
        FOREIGN_KEY_VIOLATION => Some(RecordOutcome::UnknownServer),
        _ => None,
    }
}

#[async_trait]
impl BaseVoteStore for PostgresVoteStore {
    async fn find_recent_vote(
        &self,
        user_id: UserId,
        server_id: ServerId,
        since: DateTime<Utc>,
    ) -> Result<Option<VoteRecord>> {
        VoteRecord::find_latest_since(user_id, server_id, since, &self.pool)
            .await
            .context("Failed to look up recent votes")
    }

    async fn find_server(&self, server_id: ServerId) -> Result<Option<Server>> {
        Server::find_approved_by_id(server_id, &self.pool)
            .await
            .context("Failed to look up server")
    }

    async fn record_vote(&self, vote: NewVote) -> Result<RecordOutcome> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin vote transaction")?;

        let inserted = match VoteRecord::insert(&vote, &mut tx).await {
            Ok(record) => record,
            Err(err) => {
                let Some(outcome) = classify_insert_error(&err) else {
                    return Err(anyhow::Error::new(err).context("Failed to insert vote"));
                };
                debug!(
                    user_id = %vote.user_id,
                    server_id = %vote.server_id,
                    outcome = ?outcome,
                    "Vote insert rejected by constraint"
                );
                if let Err(e) = tx.rollback().await {
                    warn!(error = %e, "Failed to roll back rejected vote");
                }
                return Ok(outcome);
            }
        };

        let Some(votes_count) = Server::increment_votes(vote.server_id, &mut tx).await? else {
            // Server exists but is not approved; undo the insert
            tx.rollback()
                .await
                .context("Failed to roll back vote for unapproved server")?;
            return Ok(RecordOutcome::UnknownServer);
        };

        tx.commit().await.context("Failed to commit vote")?;

        Ok(RecordOutcome::Recorded {
            vote: inserted,
            votes_count,
        })
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .context("Database ping failed")
    }
}
