use crate::error::ValidationError;

/// Normalize a free-text phone number to `DDD-DDD-DDDD`.
///
/// Empty input is allowed (the field is optional). Anything that does not
/// reduce to exactly ten digits is returned unchanged with an error.
pub fn normalize_phone(raw: &str) -> (String, Option<ValidationError>) {
    if raw.is_empty() {
        return (String::new(), None);
    }

    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() == 10 {
        let formatted = format!("{}-{}-{}", &digits[0..3], &digits[3..6], &digits[6..10]);
        return (formatted, None);
    }

    (
        raw.to_string(),
        Some(ValidationError::Phone {
            raw: raw.to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ten_digits() {
        assert_eq!(normalize_phone("1234567890"), ("123-456-7890".to_string(), None));
    }

    #[test]
    fn test_formatted_input() {
        assert_eq!(normalize_phone("(617) 555-0100").0, "617-555-0100");
        assert_eq!(normalize_phone("617.555.0100").0, "617-555-0100");
        assert!(normalize_phone("617 555 0100").1.is_none());
    }

    #[test]
    fn test_too_short() {
        let (value, err) = normalize_phone("555-12");
        assert_eq!(value, "555-12");
        assert_eq!(
            err,
            Some(ValidationError::Phone {
                raw: "555-12".to_string()
            })
        );
    }

    #[test]
    fn test_country_code_is_rejected() {
        let (value, err) = normalize_phone("+1 617 555 0100");
        assert_eq!(value, "+1 617 555 0100");
        assert!(err.is_some());
    }

    #[test]
    fn test_empty() {
        assert_eq!(normalize_phone(""), (String::new(), None));
    }

    #[test]
    fn test_no_digits() {
        let (value, err) = normalize_phone("n/a");
        assert_eq!(value, "n/a");
        assert!(err.is_some());
    }
}
