//! Integration tests for vote admission against a real Postgres.
//!
//! Covers the parts the in-memory store cannot prove:
//! - The exclusion constraint rejects overlapping votes even when the
//!   pre-check is bypassed
//! - Vote insert and counter increment commit or roll back together
//!
//! These start a Postgres container and need Docker:
//! `cargo test -p server --test vote_admission_tests -- --ignored`

mod common;

use chrono::{Duration, Utc};
use common::{fixtures, TestHarness};
use serverlist_core::common::{ServerId, UserId};
use serverlist_core::domains::votes::models::{NewVote, VoteRecord};
use serverlist_core::domains::votes::{cast_vote, vote_status, VoteError};
use serverlist_core::kernel::{BaseVoteStore, RecordOutcome};
use test_context::test_context;

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn test_vote_window_scenario(ctx: &TestHarness) {
    let server = fixtures::create_approved_server(&ctx.db_pool, "Skyblock")
        .await
        .unwrap();
    let user = UserId::new();
    let t0 = Utc::now();

    let first = cast_vote(user, server, t0, &ctx.deps).await.unwrap();
    assert_eq!(first.votes_count, 1);

    let again = cast_vote(user, server, t0 + Duration::hours(1), &ctx.deps).await;
    assert!(matches!(again, Err(VoteError::RateLimited { .. })));
    assert_eq!(fixtures::votes_count(&ctx.db_pool, server).await.unwrap(), 1);

    let later = cast_vote(user, server, t0 + Duration::hours(25), &ctx.deps)
        .await
        .unwrap();
    assert_eq!(later.votes_count, 2);
    assert_eq!(fixtures::votes_count(&ctx.db_pool, server).await.unwrap(), 2);
    assert_eq!(
        VoteRecord::count_for_pair(user, server, &ctx.db_pool)
            .await
            .unwrap(),
        2
    );
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn test_constraint_rejects_overlap_without_precheck(ctx: &TestHarness) {
    let server = fixtures::create_approved_server(&ctx.db_pool, "Prison")
        .await
        .unwrap();
    let user = UserId::new();
    let t0 = Utc::now();

    let first = ctx
        .store
        .record_vote(NewVote::new(user, server, t0, Duration::hours(24)))
        .await
        .unwrap();
    assert!(matches!(first, RecordOutcome::Recorded { votes_count: 1, .. }));

    let overlapping = ctx
        .store
        .record_vote(NewVote::new(user, server, t0 + Duration::hours(3), Duration::hours(24)))
        .await
        .unwrap();
    assert!(matches!(overlapping, RecordOutcome::Duplicate));

    // Rolled back: no extra row, no extra increment
    assert_eq!(fixtures::votes_count(&ctx.db_pool, server).await.unwrap(), 1);
    assert_eq!(
        VoteRecord::count_for_pair(user, server, &ctx.db_pool)
            .await
            .unwrap(),
        1
    );
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn test_concurrent_inserts_accept_exactly_one(ctx: &TestHarness) {
    let server = fixtures::create_approved_server(&ctx.db_pool, "Towny")
        .await
        .unwrap();
    let user = UserId::new();
    let now = Utc::now();

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let store = ctx.store.clone();
            tokio::spawn(async move {
                store
                    .record_vote(NewVote::new(
                        user,
                        server,
                        now + Duration::milliseconds(i),
                        Duration::hours(24),
                    ))
                    .await
            })
        })
        .collect();

    let mut recorded = 0;
    let mut duplicates = 0;
    for handle in handles {
        match handle.await.unwrap().unwrap() {
            RecordOutcome::Recorded { .. } => recorded += 1,
            RecordOutcome::Duplicate => duplicates += 1,
            RecordOutcome::UnknownServer => panic!("server should exist"),
        }
    }

    assert_eq!(recorded, 1);
    assert_eq!(duplicates, 19);
    assert_eq!(fixtures::votes_count(&ctx.db_pool, server).await.unwrap(), 1);
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn test_unknown_and_pending_servers_write_nothing(ctx: &TestHarness) {
    let pending = fixtures::create_pending_server(&ctx.db_pool, "Pending")
        .await
        .unwrap();
    let missing = ServerId::new(i64::MAX).unwrap();
    let user = UserId::new();

    for server in [pending, missing] {
        let result = cast_vote(user, server, Utc::now(), &ctx.deps).await;
        assert!(matches!(result, Err(VoteError::InvalidArgument(_))));
        assert_eq!(
            VoteRecord::count_for_pair(user, server, &ctx.db_pool)
                .await
                .unwrap(),
            0
        );
    }
    assert_eq!(fixtures::votes_count(&ctx.db_pool, pending).await.unwrap(), 0);
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn test_vote_status_reads_postgres(ctx: &TestHarness) {
    let server = fixtures::create_approved_server(&ctx.db_pool, "Factions")
        .await
        .unwrap();
    let user = UserId::new();
    let t0 = Utc::now();

    cast_vote(user, server, t0, &ctx.deps).await.unwrap();

    let status = vote_status(user, server, t0 + Duration::hours(1), &ctx.deps)
        .await
        .unwrap();
    assert!(!status.can_vote);
    assert_eq!(status.votes_count, 1);
    assert!(status.next_vote_at.is_some());
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn test_store_ping(ctx: &TestHarness) {
    ctx.store.ping().await.unwrap();
}
