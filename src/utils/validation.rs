// Validation utilities for string fields

/// Trim and validate string fields
///
/// # Arguments
/// * `field` - The string field to validate
/// * `required` - Whether the field is required (cannot be empty)
///
/// # Returns
/// * `Ok(String)` - The trimmed string if valid
/// * `Err(String)` - Error message if validation fails
pub fn trim_and_validate_field(field: &str, required: bool) -> Result<String, String> {
    let trimmed = field.trim().to_string();
    if trimmed.is_empty() {
        if required {
            Err("Field cannot be empty".to_string())
        } else {
            Ok(trimmed) // For optional fields, empty is valid
        }
    } else {
        Ok(trimmed)
    }
}

/// Trim and optionally validate a string field
///
/// # Returns
/// * `None` - If the field is None or empty after trimming
/// * `Some(String)` - The trimmed string if not empty
pub fn trim_optional_field(field: Option<&String>) -> Option<String> {
    field.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Truncate a string to at most `max` characters, logging when data is cut
pub fn truncate_to_limit(field: &str, name: &str, max: usize) -> String {
    if field.chars().count() > max {
        tracing::warn!(
            "{} too long, truncating from {} to {} characters",
            name,
            field.chars().count(),
            max
        );
        field.chars().take(max).collect()
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_and_validate_required() {
        assert_eq!(trim_and_validate_field("  hello  ", true), Ok("hello".to_string()));
        assert!(trim_and_validate_field("   ", true).is_err());
    }

    #[test]
    fn test_trim_optional() {
        assert_eq!(trim_optional_field(None), None);
        assert_eq!(trim_optional_field(Some(&"  ".to_string())), None);
        assert_eq!(
            trim_optional_field(Some(&" x ".to_string())),
            Some("x".to_string())
        );
    }

    #[test]
    fn test_truncate_to_limit() {
        assert_eq!(truncate_to_limit("abcdef", "field", 3), "abc");
        assert_eq!(truncate_to_limit("ab", "field", 3), "ab");
    }
}
