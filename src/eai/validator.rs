use super::outcome::ErrorCode;
use regex::Regex;

pub const MIN_IDENTIFIER_LEN: usize = 3;
pub const MAX_IDENTIFIER_LEN: usize = 45;

#[must_use]
pub fn valid_identifier(identifier: &str) -> bool {
    // ASCII letters and digits only, 3 to 45 characters
    Regex::new(r"^[A-Za-z0-9]{3,45}$").is_ok_and(|re| re.is_match(identifier))
}

/// # Errors
/// Returns `ErrorCode::InvalidInput` if the identifier is not alphanumeric or its
/// length is outside `[MIN_IDENTIFIER_LEN, MAX_IDENTIFIER_LEN]`.
pub fn validate_identifier(identifier: &str) -> Result<(), ErrorCode> {
    if valid_identifier(identifier) {
        Ok(())
    } else {
        Err(ErrorCode::InvalidInput)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bounds() {
        assert!(valid_identifier(&"a".repeat(MIN_IDENTIFIER_LEN)));
        assert!(valid_identifier(&"a".repeat(MAX_IDENTIFIER_LEN)));
        assert!(valid_identifier("jdoe"));
        assert!(valid_identifier("JDoe2024"));
    }

    #[test]
    fn rejects_length() {
        assert!(!valid_identifier(""));
        assert!(!valid_identifier("ab"));
        assert!(!valid_identifier(&"a".repeat(MAX_IDENTIFIER_LEN + 1)));
    }

    #[test]
    fn rejects_non_alphanumeric() {
        for identifier in [
            "j!",
            "j.doe",
            "jdoe@corp",
            "j doe",
            "jdoe\n",
            "*)(cn=*",
            "jdö",
            "ｊｄｏｅ",
            "-jdoe",
        ] {
            assert!(!valid_identifier(identifier), "{identifier:?}");
        }
    }

    #[test]
    fn validate_maps_to_invalid_input() {
        assert_eq!(validate_identifier("jdoe"), Ok(()));
        assert_eq!(validate_identifier("j!"), Err(ErrorCode::InvalidInput));
    }
}
