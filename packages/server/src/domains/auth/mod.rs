//! Auth domain - verifies bearer tokens minted by the identity provider.
//!
//! The service never signs users in itself; it only resolves a caller's
//! identity from the `Authorization` header.

pub mod jwt;

pub use jwt::{Claims, JwtService};
