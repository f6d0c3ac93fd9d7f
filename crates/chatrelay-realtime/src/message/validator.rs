//! Message text validation rules.

use chatrelay_core::error::AppError;

/// Maximum allowed message length in characters.
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// Validates message text, returning the trimmed body to store.
///
/// Length is checked on the raw text; the stored and broadcast body is
/// the trimmed form.
pub fn validate_text(text: &str) -> Result<&str, AppError> {
    if text.chars().count() > MAX_MESSAGE_CHARS {
        return Err(AppError::validation(format!(
            "Message exceeds maximum length of {MAX_MESSAGE_CHARS} characters"
        )));
    }

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("Message text is empty"));
    }

    Ok(trimmed)
}
