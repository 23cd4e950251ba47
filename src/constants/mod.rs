//! Store constants module.
//!
//! This module centralizes the constant strings and numbers used throughout the
//! store, including collection names, error codes, error messages and the
//! verification-code settings.

pub mod collections;
pub mod error_codes;
pub mod errors;
pub mod verification;

pub use collections::*;
pub use error_codes::*;
pub use errors::*;
pub use verification::*;
