//! Services organized by domain concern.

pub mod store;
pub mod verification;

pub use store::{Store, UpdatePolicy};
