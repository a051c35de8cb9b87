//! Test fixtures for creating test data.
//!
//! These fixtures use the model methods directly to create test data.

use anyhow::Result;
use serverlist_core::common::ServerId;
use serverlist_core::domains::servers::models::{Server, STATUS_APPROVED, STATUS_PENDING};
use sqlx::PgPool;

/// Create an approved (votable) server
pub async fn create_approved_server(pool: &PgPool, name: &str) -> Result<ServerId> {
    Ok(Server::create(name, STATUS_APPROVED, pool).await?.id)
}

/// Create a server still awaiting moderation
pub async fn create_pending_server(pool: &PgPool, name: &str) -> Result<ServerId> {
    Ok(Server::create(name, STATUS_PENDING, pool).await?.id)
}

/// Current counter value for a server
pub async fn votes_count(pool: &PgPool, server_id: ServerId) -> Result<i64> {
    let server = Server::find_by_id(server_id, pool)
        .await?
        .ok_or_else(|| anyhow::anyhow!("server {} not found", server_id))?;
    Ok(server.votes_count)
}
