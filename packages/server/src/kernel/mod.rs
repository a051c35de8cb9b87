//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod test_dependencies;
pub mod traits;
pub mod vote_store;

pub use crate::domains::auth::JwtService;
pub use deps::ServerDeps;
pub use test_dependencies::{InMemoryVoteStore, TestDependencies};
pub use traits::*;
pub use vote_store::PostgresVoteStore;
