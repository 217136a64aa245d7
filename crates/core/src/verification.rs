//! Email verification codes.
//!
//! Codes are short numeric strings mailed to the user and stored with an
//! expiry. They are single use: a successful login consumes the code, and
//! [`MAX_CODE_ATTEMPTS`] wrong guesses discard it.

use rand::Rng;

/// Number of digits in a verification code.
pub const CODE_LENGTH: usize = 6;

/// Default lifetime of an issued code, in minutes.
pub const DEFAULT_CODE_TTL_MINS: i64 = 10;

/// Wrong guesses allowed before a code is invalidated.
pub const MAX_CODE_ATTEMPTS: i32 = 5;

/// Generate a zero-padded numeric code of [`CODE_LENGTH`] digits.
pub fn generate_code() -> String {
    let upper = 10u32.pow(CODE_LENGTH as u32);
    let n = rand::rng().random_range(0..upper);
    format!("{n:0width$}", width = CODE_LENGTH)
}

/// Check that user input has the shape of a code before hitting the database.
pub fn is_well_formed_code(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.bytes().all(|b| b.is_ascii_digit())
}

/// Compare a submitted code against the stored one without short-circuiting.
pub fn codes_match(submitted: &str, stored: &str) -> bool {
    if submitted.len() != stored.len() {
        return false;
    }
    submitted
        .bytes()
        .zip(stored.bytes())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

/// Normalize an email address for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_are_well_formed() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), CODE_LENGTH);
            assert!(is_well_formed_code(&code), "bad code: {code}");
        }
    }

    #[test]
    fn malformed_codes_rejected() {
        assert!(!is_well_formed_code("12345"));
        assert!(!is_well_formed_code("1234567"));
        assert!(!is_well_formed_code("12a456"));
        assert!(!is_well_formed_code(""));
    }

    #[test]
    fn code_comparison() {
        assert!(codes_match("012345", "012345"));
        assert!(!codes_match("012345", "012346"));
        assert!(!codes_match("01234", "012345"));
    }

    #[test]
    fn emails_are_normalized() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
    }
}
