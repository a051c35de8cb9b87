pub mod auth;
pub mod servers;
pub mod votes;
