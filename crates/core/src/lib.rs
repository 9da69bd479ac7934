//! Core business logic for vidtube-rs.

pub mod guard;
pub mod services;

#[cfg(test)]
mod test_support;

pub use guard::{Owned, require_owner};
pub use services::*;
