//! Servers domain - the listed game servers.
//!
//! Submission and moderation belong to the directory front end; the vote
//! service only reads servers and bumps their `votes_count`.

pub mod models;

pub use models::Server;
