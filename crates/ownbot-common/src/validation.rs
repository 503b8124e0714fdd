//! Input validation utilities.
//!
//! Centralized validation helpers used across API routes.

use validator::Validate;

use crate::error::OwnBotError;

/// Validate a request body, returning an OwnBotError::Validation on failure.
pub fn validate_request<T: Validate>(body: &T) -> Result<(), OwnBotError> {
    body.validate().map_err(|e| OwnBotError::Validation {
        message: format_validation_errors(e),
    })
}

/// Format validation errors into a human-readable string.
fn format_validation_errors(errors: validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for '{field}'"))
            })
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validate an E.164 phone number (`+` followed by 8-15 digits).
pub fn validate_e164(number: &str) -> Result<(), OwnBotError> {
    let Some(digits) = number.strip_prefix('+') else {
        return Err(OwnBotError::Validation {
            message: "Phone number must start with '+' (E.164)".into(),
        });
    };

    if !(8..=15).contains(&digits.len()) || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(OwnBotError::Validation {
            message: "Phone number must be 8-15 digits after '+' (E.164)".into(),
        });
    }

    // Leading zero is not a valid country code
    if digits.starts_with('0') {
        return Err(OwnBotError::Validation {
            message: "Phone number country code cannot start with 0".into(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, Validate)]
    struct Probe {
        #[validate(length(min = 1, max = 10, message = "name must be 1-10 characters"))]
        name: String,
    }

    #[test]
    fn validate_request_surfaces_field_messages() {
        let err = validate_request(&Probe { name: String::new() }).unwrap_err();
        match err {
            OwnBotError::Validation { message } => {
                assert!(message.contains("1-10 characters"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn validate_request_accepts_valid_body() {
        assert!(validate_request(&Probe { name: "widget".into() }).is_ok());
    }

    #[test]
    fn e164_accepts_plausible_numbers() {
        assert!(validate_e164("+14155552671").is_ok());
        assert!(validate_e164("+4915123456789").is_ok());
    }

    #[test]
    fn e164_rejects_bad_shapes() {
        assert!(validate_e164("14155552671").is_err()); // missing +
        assert!(validate_e164("+1-415-555").is_err()); // non-digits
        assert!(validate_e164("+0123456789").is_err()); // zero country code
        assert!(validate_e164("+123").is_err()); // too short
        assert!(validate_e164("+1234567890123456").is_err()); // too long
    }
}
