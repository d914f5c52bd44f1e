// Custom validation functions for domain-specific rules, used from
// `validator` derives on request DTOs.

use validator::ValidationError;

/// Validates that a transaction PIN is exactly 6 digits.
pub fn validate_pin(pin: &str) -> Result<(), ValidationError> {
    if pin.len() == 6 && pin.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("pin_must_be_six_digits"))
    }
}

/// Validates that a review rating is between 1 and 5.
pub fn validate_rating(rating: i32) -> Result<(), ValidationError> {
    if (1..=5).contains(&rating) {
        Ok(())
    } else {
        Err(ValidationError::new("rating_out_of_range"))
    }
}

/// Validates that a slot string is in HH:MM form on the hour grid.
pub fn validate_slot_format(slot: &str) -> Result<(), ValidationError> {
    let valid = slot.len() == 5
        && slot.as_bytes()[2] == b':'
        && slot[..2].chars().all(|c| c.is_ascii_digit())
        && slot[3..].chars().all(|c| c.is_ascii_digit());
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_slot_format"))
    }
}

/// Validates that a theme preference is one of the supported values.
pub fn validate_theme(theme: &str) -> Result<(), ValidationError> {
    if theme == "light" || theme == "dark" {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_theme"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_validation() {
        assert!(validate_pin("123456").is_ok());
        assert!(validate_pin("000000").is_ok());
        assert!(validate_pin("12345").is_err());
        assert!(validate_pin("1234567").is_err());
        assert!(validate_pin("12a456").is_err());
        assert!(validate_pin("").is_err());
    }

    #[test]
    fn test_rating_validation() {
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
    }

    #[test]
    fn test_slot_format_validation() {
        assert!(validate_slot_format("09:00").is_ok());
        assert!(validate_slot_format("17:00").is_ok());
        assert!(validate_slot_format("9:00").is_err());
        assert!(validate_slot_format("09-00").is_err());
        assert!(validate_slot_format("0900").is_err());
    }

    #[test]
    fn test_theme_validation() {
        assert!(validate_theme("light").is_ok());
        assert!(validate_theme("dark").is_ok());
        assert!(validate_theme("sepia").is_err());
    }
}
