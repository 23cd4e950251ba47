//! Verification code settings.

/// Minimum time between two SMS codes issued to the same user, in milliseconds.
pub const SMS_THROTTLE_WINDOW_MS: i64 = 60_000;

/// Number of digits in a generated verification code.
pub const VERIFICATION_CODE_LENGTH: usize = 6;
