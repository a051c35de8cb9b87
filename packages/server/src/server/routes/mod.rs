// HTTP routes
pub mod health;
pub mod votes;

pub use health::*;
pub use votes::*;
