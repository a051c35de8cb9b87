//! Votes domain - once-per-cooldown voting for listed servers.

pub mod actions;
pub mod errors;
pub mod models;

pub use actions::{cast_vote, vote_status, VoteReceipt, VoteStatus};
pub use errors::VoteError;
pub use models::{NewVote, VoteRecord};
