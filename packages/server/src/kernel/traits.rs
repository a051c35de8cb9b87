// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// The admission rule itself lives in domains/votes/actions.
//
// Naming convention: Base* for trait names (e.g., BaseVoteStore)

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::common::{ServerId, UserId};
use crate::domains::servers::Server;
use crate::domains::votes::models::{NewVote, VoteRecord};

// =============================================================================
// Vote Store Trait (Infrastructure - persistence for votes and counters)
// =============================================================================

/// Result of trying to persist a vote.
#[derive(Debug, Clone)]
pub enum RecordOutcome {
    /// Vote row inserted and the server counter bumped, atomically.
    Recorded { vote: VoteRecord, votes_count: i64 },
    /// Another vote for the same pair already occupies the window.
    /// Nothing was written.
    Duplicate,
    /// Server missing or not approved. Nothing was written.
    UnknownServer,
}

#[async_trait]
pub trait BaseVoteStore: Send + Sync {
    /// Most recent vote for the pair cast strictly after `since`
    async fn find_recent_vote(
        &self,
        user_id: UserId,
        server_id: ServerId,
        since: DateTime<Utc>,
    ) -> Result<Option<VoteRecord>>;

    /// Look up an approved server
    async fn find_server(&self, server_id: ServerId) -> Result<Option<Server>>;

    /// Insert the vote and increment the server's counter as one unit.
    ///
    /// Implementations must enforce the one-vote-per-window rule themselves;
    /// callers' pre-checks are only a fast path.
    async fn record_vote(&self, vote: NewVote) -> Result<RecordOutcome>;

    /// Cheap liveness probe for health checks
    async fn ping(&self) -> Result<()>;
}
