// QR token generation tests: shape, uniqueness, and validation

use std::collections::HashSet;
use vms_backend_core::services::{generate_qr_code, is_valid_qr_code};

#[test]
fn test_qr_code_format() {
    let code = generate_qr_code();

    let parts: Vec<&str> = code.split('-').collect();
    assert_eq!(parts.len(), 3, "unexpected shape: {}", code);
    assert_eq!(parts[0], "VMS");
    assert!(
        parts[1].parse::<i64>().is_ok(),
        "timestamp segment not numeric: {}",
        code
    );
    assert_eq!(parts[2].len(), 9);
    assert!(parts[2].chars().all(|c| c.is_ascii_alphanumeric()));
}

#[test]
fn test_qr_codes_are_unique_across_a_batch() {
    let codes: HashSet<String> = (0..1000).map(|_| generate_qr_code()).collect();
    assert_eq!(codes.len(), 1000, "collision within a single batch");
}

#[test]
fn test_generated_codes_pass_validation() {
    for _ in 0..50 {
        let code = generate_qr_code();
        assert!(is_valid_qr_code(&code), "generated code failed: {}", code);
    }
}

#[test]
fn test_malformed_codes_fail_validation() {
    for bad in [
        "",
        "VMS",
        "VMS-",
        "VMS-123-abc",
        "VMS-notanumber-abcdefghi",
        "XYZ-1700000000-abcdefghi",
        "VMS-1700000000-abc def hi",
    ] {
        assert!(!is_valid_qr_code(bad), "accepted malformed code: {}", bad);
    }
}
