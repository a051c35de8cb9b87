//! Server dependencies (using traits for testability)
//!
//! The single dependency container handed to actions and HTTP handlers.
//! There is no global database client: the store is injected here.

use chrono::Duration;
use std::sync::Arc;

use crate::domains::auth::JwtService;
use crate::kernel::BaseVoteStore;

#[derive(Clone)]
pub struct ServerDeps {
    pub vote_store: Arc<dyn BaseVoteStore>,
    /// JWT service for bearer token verification
    pub jwt_service: Arc<JwtService>,
    /// How long a vote blocks the next one for the same (user, server)
    pub vote_cooldown: Duration,
}

impl ServerDeps {
    pub fn new(
        vote_store: Arc<dyn BaseVoteStore>,
        jwt_service: Arc<JwtService>,
        vote_cooldown: Duration,
    ) -> Self {
        Self {
            vote_store,
            jwt_service,
            vote_cooldown,
        }
    }

    pub fn vote_cooldown_hours(&self) -> i64 {
        self.vote_cooldown.num_hours()
    }
}
