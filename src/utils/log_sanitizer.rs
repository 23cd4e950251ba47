//! Log sanitization utilities for masking phone numbers.
//!
//! Phone numbers are the natural key for users, so they show up in lookups,
//! warnings and error messages. They are masked before leaving the crate.

/// Mask a phone number for safe logging.
///
/// Keeps the first 4 characters (the `+` and country code for E.164 numbers)
/// and the last 2 digits.
///
/// # Examples
/// ```ignore
/// assert_eq!(mask_phone("+15550001111"), "+155******11");
/// assert_eq!(mask_phone("12345"), "123***");
/// ```
pub fn mask_phone(phone: &str) -> String {
    let chars: Vec<char> = phone.chars().collect();

    if chars.len() <= 6 {
        let visible: String = chars.iter().take(chars.len().min(3)).collect();
        return format!("{}***", visible);
    }

    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}{}{}", head, "*".repeat(chars.len() - 6), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_phone_e164() {
        assert_eq!(mask_phone("+15550001111"), "+155******11");
    }

    #[test]
    fn test_mask_phone_short() {
        assert_eq!(mask_phone("12345"), "123***");
        assert_eq!(mask_phone("12"), "12***");
        assert_eq!(mask_phone(""), "***");
    }

    #[test]
    fn test_mask_phone_keeps_length() {
        let masked = mask_phone("+447700900123");
        assert_eq!(masked.len(), "+447700900123".len());
        assert!(masked.starts_with("+447"));
        assert!(masked.ends_with("23"));
    }
}
