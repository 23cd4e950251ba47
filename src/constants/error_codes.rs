//! Error code constants for store errors.
//!
//! These codes provide a machine-readable identifier for each error, so the
//! application layer can branch on them without matching error messages.

// Configuration errors
pub const CODE_MISSING_REQUIRED_ENV_VAR: &str = "MISSING_REQUIRED_ENV_VAR";

// Lookup errors
pub const CODE_NOT_FOUND: &str = "NOT_FOUND";
pub const CODE_UNINITIALIZED: &str = "UNINITIALIZED";

// Write errors
pub const CODE_ALREADY_EXISTS: &str = "ALREADY_EXISTS";

// Verification errors
pub const CODE_THROTTLED: &str = "THROTTLED";

// Generic errors
pub const CODE_DATABASE_ERROR: &str = "DATABASE_ERROR";
