// TestDependencies - in-memory implementations for testing
//
// Provides an in-memory vote store that can be injected into ServerDeps for
// tests without a database.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::{BaseVoteStore, JwtService, RecordOutcome, ServerDeps};
use crate::common::{ServerId, UserId, VoteId};
use crate::domains::servers::models::{Server, STATUS_APPROVED};
use crate::domains::votes::models::{NewVote, VoteRecord};

// =============================================================================
// In-memory Vote Store
// =============================================================================

#[derive(Default)]
struct StoreState {
    servers: HashMap<ServerId, Server>,
    votes: Vec<VoteRecord>,
    next_server_id: i64,
}

/// Vote store backed by a mutex-guarded map.
///
/// `record_vote` checks for overlapping windows under the lock, the same
/// rule the Postgres exclusion constraint enforces.
pub struct InMemoryVoteStore {
    state: Mutex<StoreState>,
    stale_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl InMemoryVoteStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(StoreState {
                next_server_id: 1,
                ..Default::default()
            }),
            stale_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Make `find_recent_vote` always miss, so every request reaches the
    /// insert (simulates concurrent requests passing the pre-check).
    pub fn with_stale_reads(self) -> Self {
        self.stale_reads.store(true, Ordering::SeqCst);
        self
    }

    /// Make `record_vote` fail as if the database were unreachable.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Add a server with the given moderation status and return its id.
    pub fn add_server(&self, name: &str, status: &str) -> ServerId {
        let mut state = self.state.lock().unwrap();
        let id = ServerId::new(state.next_server_id).expect("server ids start at 1");
        state.next_server_id += 1;
        state.servers.insert(
            id,
            Server {
                id,
                name: name.to_string(),
                status: status.to_string(),
                votes_count: 0,
                created_at: Utc::now(),
            },
        );
        id
    }

    pub fn add_approved_server(&self, name: &str) -> ServerId {
        self.add_server(name, STATUS_APPROVED)
    }

    pub fn votes_count(&self, server_id: ServerId) -> Option<i64> {
        self.state
            .lock()
            .unwrap()
            .servers
            .get(&server_id)
            .map(|s| s.votes_count)
    }

    /// All stored votes for the pair, oldest first.
    pub fn votes_for(&self, user_id: UserId, server_id: ServerId) -> Vec<VoteRecord> {
        let mut votes: Vec<VoteRecord> = self
            .state
            .lock()
            .unwrap()
            .votes
            .iter()
            .filter(|v| v.user_id == user_id && v.server_id == server_id)
            .cloned()
            .collect();
        votes.sort_by_key(|v| v.voted_at);
        votes
    }

    pub fn total_votes(&self) -> usize {
        self.state.lock().unwrap().votes.len()
    }
}

impl Default for InMemoryVoteStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseVoteStore for InMemoryVoteStore {
    async fn find_recent_vote(
        &self,
        user_id: UserId,
        server_id: ServerId,
        since: DateTime<Utc>,
    ) -> Result<Option<VoteRecord>> {
        if self.stale_reads.load(Ordering::SeqCst) {
            return Ok(None);
        }
        let state = self.state.lock().unwrap();
        Ok(state
            .votes
            .iter()
            .filter(|v| v.user_id == user_id && v.server_id == server_id && v.voted_at > since)
            .max_by_key(|v| v.voted_at)
            .cloned())
    }

    async fn find_server(&self, server_id: ServerId) -> Result<Option<Server>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .servers
            .get(&server_id)
            .filter(|s| s.is_approved())
            .cloned())
    }

    async fn record_vote(&self, vote: NewVote) -> Result<RecordOutcome> {
        if self.fail_writes.load(Ordering::SeqCst) {
            anyhow::bail!("connection refused");
        }

        let mut state = self.state.lock().unwrap();

        if !state
            .servers
            .get(&vote.server_id)
            .is_some_and(|s| s.is_approved())
        {
            return Ok(RecordOutcome::UnknownServer);
        }

        if state.votes.iter().any(|existing| vote.conflicts_with(existing)) {
            return Ok(RecordOutcome::Duplicate);
        }

        let record = VoteRecord {
            id: VoteId::new(),
            user_id: vote.user_id,
            server_id: vote.server_id,
            voted_at: vote.voted_at,
            cooldown_ends_at: vote.cooldown_ends_at,
        };
        state.votes.push(record.clone());

        let server = state
            .servers
            .get_mut(&vote.server_id)
            .expect("server presence checked above");
        server.votes_count += 1;
        let votes_count = server.votes_count;

        Ok(RecordOutcome::Recorded {
            vote: record,
            votes_count,
        })
    }

    async fn ping(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            anyhow::bail!("connection refused");
        }
        Ok(())
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

pub const TEST_JWT_SECRET: &str = "test_secret_key";
pub const TEST_JWT_ISSUER: &str = "test_issuer";
pub const TEST_JWT_AUDIENCE: &str = "authenticated";

/// Bundles an in-memory store with a JWT service sharing known test keys.
pub struct TestDependencies {
    pub store: Arc<InMemoryVoteStore>,
    pub jwt_service: Arc<JwtService>,
    pub vote_cooldown: Duration,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self::with_store(InMemoryVoteStore::new())
    }

    pub fn with_store(store: InMemoryVoteStore) -> Self {
        Self {
            store: Arc::new(store),
            jwt_service: Arc::new(JwtService::new(
                TEST_JWT_SECRET,
                TEST_JWT_ISSUER.to_string(),
                TEST_JWT_AUDIENCE.to_string(),
            )),
            vote_cooldown: Duration::hours(24),
        }
    }

    /// A valid bearer token for `user_id`.
    pub fn token_for(&self, user_id: UserId) -> String {
        self.jwt_service
            .create_token(user_id, None, Duration::hours(1))
            .expect("test token encodes")
    }

    pub fn server_deps(&self) -> ServerDeps {
        ServerDeps::new(
            self.store.clone(),
            self.jwt_service.clone(),
            self.vote_cooldown,
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
