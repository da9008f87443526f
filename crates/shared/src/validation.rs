//! Input normalization and custom validators.

use validator::ValidationError;

/// Minimum number of digits in a contact phone number.
const MIN_PHONE_DIGITS: usize = 7;

/// Normalizes a ticket code typed or scanned at the door.
///
/// Surrounding whitespace is dropped and letters are upper-cased, so
/// ` spring26-0a1b2c3d ` and `SPRING26-0A1B2C3D` address the same ticket.
pub fn normalize_ticket_code(input: &str) -> String {
    input.trim().to_uppercase()
}

/// Normalizes an event code taken from a registration link.
pub fn normalize_event_code(input: &str) -> String {
    input.trim().to_uppercase()
}

/// Normalizes an email address for storage and lookup.
pub fn normalize_email(input: &str) -> String {
    input.trim().to_lowercase()
}

/// Validates a contact phone number.
///
/// Accepts digits plus the usual separators (`+`, `-`, space, parentheses)
/// and requires at least seven digits.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let allowed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'));
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();

    if allowed && digits >= MIN_PHONE_DIGITS {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone_format");
        err.message = Some("Phone must contain at least 7 digits and only +-() separators".into());
        Err(err)
    }
}

/// Validates that a free-text field is not blank after trimming.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}
