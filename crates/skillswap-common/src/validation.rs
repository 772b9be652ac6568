//! Input validation utilities.
//!
//! Centralized validation helpers used across API routes.

use std::sync::LazyLock;

use validator::Validate;

use crate::error::SkillSwapError;

static TIME_OF_DAY_REGEX: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").unwrap());

/// Validate a request body, returning a SkillSwapError::Validation on failure.
pub fn validate_request<T: Validate>(body: &T) -> Result<(), SkillSwapError> {
    body.validate().map_err(|e| SkillSwapError::Validation {
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

/// Validate a wall-clock time string ("HH:MM", 24-hour).
///
/// Slots are half-hour granularity by convention only; the store accepts any
/// valid minute.
pub fn validate_time_of_day(value: &str, field: &str) -> Result<(), SkillSwapError> {
    if TIME_OF_DAY_REGEX.is_match(value) {
        Ok(())
    } else {
        Err(SkillSwapError::Validation {
            message: format!("{field} must be a 24-hour HH:MM time"),
        })
    }
}

/// Validate that a slot's time window is non-empty (end strictly after start).
///
/// "HH:MM" strings compare correctly lexicographically once both sides are
/// validated.
pub fn validate_time_range(start: &str, end: &str) -> Result<(), SkillSwapError> {
    validate_time_of_day(start, "start_time")?;
    validate_time_of_day(end, "end_time")?;
    if end <= start {
        return Err(SkillSwapError::Validation {
            message: "end_time must be after start_time".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_times() {
        for t in ["00:00", "09:30", "13:05", "23:59"] {
            assert!(validate_time_of_day(t, "start_time").is_ok(), "{t}");
        }
    }

    #[test]
    fn rejects_malformed_times() {
        for t in ["24:00", "9:30", "12:60", "noon", "12-30", ""] {
            assert!(validate_time_of_day(t, "start_time").is_err(), "{t}");
        }
    }

    #[test]
    fn rejects_empty_and_inverted_ranges() {
        assert!(validate_time_range("10:00", "10:00").is_err());
        assert!(validate_time_range("11:00", "10:30").is_err());
        assert!(validate_time_range("09:00", "10:00").is_ok());
    }
}
