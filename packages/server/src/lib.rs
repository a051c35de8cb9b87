// Game Server List - vote service core
//
// Backend for the server directory's voting: admits at most one vote per
// user and server per cooldown window and keeps each server's vote counter.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
