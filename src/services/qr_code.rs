// QR token generation for pre-registrations.
// Format: VMS-<unix-timestamp>-<9 random alphanumerics>. Collisions are
// guarded by the unique index on pre_registrations.qr_code.

use lazy_static::lazy_static;
use rand::Rng;
use regex::Regex;

const TOKEN_PREFIX: &str = "VMS";
const RANDOM_LEN: usize = 9;
const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

lazy_static! {
    static ref QR_CODE_REGEX: Regex = Regex::new(r"^VMS-\d{10,}-[A-Za-z0-9]{9}$").unwrap();
}

/// Generate a QR token for a pre-registration
pub fn generate_qr_code() -> String {
    let timestamp = chrono::Utc::now().timestamp();
    let mut rng = rand::thread_rng();
    let random: String = (0..RANDOM_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..ALPHANUMERIC.len());
            ALPHANUMERIC[idx] as char
        })
        .collect();

    format!("{}-{}-{}", TOKEN_PREFIX, timestamp, random)
}

/// Cheap shape check before hitting the database
pub fn is_valid_qr_code(code: &str) -> bool {
    QR_CODE_REGEX.is_match(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_code_shape() {
        let code = generate_qr_code();
        assert!(code.starts_with("VMS-"), "unexpected prefix: {}", code);
        assert!(is_valid_qr_code(&code), "invalid shape: {}", code);

        let parts: Vec<&str> = code.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[2].len(), 9);
        assert!(parts[1].parse::<i64>().is_ok());
    }

    #[test]
    fn test_generated_codes_differ() {
        let codes: HashSet<String> = (0..100).map(|_| generate_qr_code()).collect();
        assert_eq!(codes.len(), 100);
    }

    #[test]
    fn test_shape_check_rejects_malformed() {
        assert!(!is_valid_qr_code(""));
        assert!(!is_valid_qr_code("VMS-abc-123456789"));
        assert!(!is_valid_qr_code("VMS-1700000000-short"));
        assert!(!is_valid_qr_code("QRX-1700000000-abcdef123"));
        assert!(!is_valid_qr_code("VMS-1700000000-abcdef12!"));
    }
}
