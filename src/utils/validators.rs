use chrono::NaiveTime;

use crate::error::AppError;

/// ===============================
/// Requested time input
/// ===============================
///
/// Blank means "not requested". Accepts `HH:MM` and `HH:MM:SS`.
pub fn parse_optional_time(input: Option<&str>) -> Result<Option<NaiveTime>, AppError> {
    let Some(raw) = input.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map(Some)
        .map_err(|_| AppError::validation("invalid time, expected HH:MM"))
}

/// ===============================
/// Required free text
/// ===============================
///
/// Returns the trimmed text, or a validation error naming `field`.
pub fn require_non_empty(value: &str, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Trimmed text, or `None` when blank.
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
