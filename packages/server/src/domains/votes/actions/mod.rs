//! Vote actions - entry points called from the HTTP routes.
//!
//! Actions take an already-resolved identity, validated ids and the request
//! time, so they can be exercised without HTTP or a real clock.

pub mod cast_vote;
pub mod vote_status;

pub use cast_vote::{cast_vote, VoteReceipt};
pub use vote_status::{vote_status, VoteStatus};
