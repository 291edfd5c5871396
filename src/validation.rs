//! Field validation for user-entered stat values.
//!
//! Validators are local and recoverable: they return structured errors
//! with a user-facing message, never panic, and never mutate anything.
//! The formula library assumes its inputs already passed these checks.

use thiserror::Error;

/// Lowest legal ability score.
pub const ABILITY_SCORE_MIN: i64 = 1;
/// Highest legal ability score.
pub const ABILITY_SCORE_MAX: i64 = 1000;

/// Validation failure with a user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0}")]
    OutOfRange(String),
    #[error("{0}")]
    Empty(String),
    #[error("{0}")]
    BadFormat(String),
    #[error("{0}")]
    Invalid(String),
}

/// Validate an ability score: an integer in [1, 1000].
pub fn validate_ability_score(value: i64) -> Result<(), ValidationError> {
    if value < ABILITY_SCORE_MIN {
        return Err(ValidationError::OutOfRange(format!(
            "Minimum value is {ABILITY_SCORE_MIN}"
        )));
    }
    if value > ABILITY_SCORE_MAX {
        return Err(ValidationError::OutOfRange(format!(
            "Maximum value is {ABILITY_SCORE_MAX}"
        )));
    }
    Ok(())
}

/// Validate a manually entered AC: cannot be negative.
pub fn validate_ac(value: i64) -> Result<(), ValidationError> {
    if value < 0 {
        return Err(ValidationError::OutOfRange(
            "Cannot be negative".to_string(),
        ));
    }
    Ok(())
}

/// Validate a manually entered HP string.
///
/// HP may be a bare number or carry a dice-notation suffix like
/// `"8 (1d8+1)"`; the suffix is ignored, but the string must start with a
/// non-negative integer.
pub fn validate_hp(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Empty("HP is required".to_string()));
    }

    let leading: String = value.chars().take_while(|c| c.is_ascii_digit()).collect();
    if leading.is_empty() {
        return Err(ValidationError::BadFormat(
            "Must start with a number".to_string(),
        ));
    }
    if leading.parse::<u64>().is_err() {
        return Err(ValidationError::OutOfRange(
            "Cannot be negative".to_string(),
        ));
    }
    Ok(())
}

/// Validate a creature name: must not be blank.
pub fn validate_name(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty("Name is required".to_string()));
    }
    Ok(())
}
