//! Verification code helpers: generation, hashing and the resend throttle.

use mongodb::bson::DateTime;
use rand::Rng;
use sha2::{Digest, Sha256};

use crate::constants::{SMS_THROTTLE_WINDOW_MS, VERIFICATION_CODE_LENGTH};
use crate::errors::StoreError;

/// Lowercase hex SHA-256 of a verification code.
pub fn hash_code(code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    hex::encode(hasher.finalize())
}

/// Random numeric code, zero-padded to a fixed length.
pub fn generate_code() -> String {
    let mut rng = rand::thread_rng();
    (0..VERIFICATION_CODE_LENGTH)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// Reject a new code if the last one went out less than the throttle window ago.
pub fn check_throttle(last_sent: Option<DateTime>, now: DateTime) -> Result<(), StoreError> {
    let Some(last_sent) = last_sent else {
        return Ok(());
    };

    // Stored values may be arbitrary numbers, so saturate rather than overflow.
    let elapsed = now
        .timestamp_millis()
        .saturating_sub(last_sent.timestamp_millis());
    if elapsed < SMS_THROTTLE_WINDOW_MS {
        return Err(StoreError::Throttled {
            retry_after_ms: SMS_THROTTLE_WINDOW_MS.saturating_sub(elapsed),
        });
    }
    Ok(())
}

/// Latest `lastSentCode` that still allows a new code at `now`.
pub(crate) fn throttle_cutoff(now: DateTime) -> DateTime {
    DateTime::from_millis(now.timestamp_millis().saturating_sub(SMS_THROTTLE_WINDOW_MS))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: i64) -> DateTime {
        DateTime::from_millis(ms)
    }

    #[test]
    fn test_hash_code_is_sha256_hex() {
        assert_eq!(
            hash_code("123456"),
            "8d969eef6ecad3c29a3a629280e686cf0c3f5d5a86aff3ca12020c923adc6c92"
        );
        assert_ne!(hash_code("123456"), hash_code("000000"));
    }

    #[test]
    fn test_generate_code_shape() {
        for _ in 0..50 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_throttle_allows_first_code() {
        assert!(check_throttle(None, at(1_000)).is_ok());
    }

    #[test]
    fn test_throttle_rejects_within_window() {
        let err = check_throttle(Some(at(100_000)), at(130_000)).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Throttled {
                retry_after_ms: 30_000
            }
        ));
    }

    #[test]
    fn test_throttle_allows_after_window() {
        assert!(check_throttle(Some(at(100_000)), at(160_000)).is_ok());
        assert!(check_throttle(Some(at(100_000)), at(500_000)).is_ok());
        assert!(check_throttle(Some(at(100_000)), at(159_999)).is_err());
    }

    #[test]
    fn test_throttle_saturates_on_extreme_timestamps() {
        assert!(check_throttle(Some(at(i64::MIN)), at(1_000)).is_ok());

        let err = check_throttle(Some(at(i64::MAX)), at(-1_000)).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Throttled {
                retry_after_ms: i64::MAX
            }
        ));
    }

    #[test]
    fn test_throttle_cutoff() {
        assert_eq!(throttle_cutoff(at(160_000)), at(100_000));
    }
}
