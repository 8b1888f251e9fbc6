//! Request Validation
//!
//! Structural rules for the create/update task bodies, shared so the server
//! enforces exactly what the client expects. Rules are checked in order and
//! the first violation's message is reported. Validation owns the
//! sanitize-then-revalidate step: callers get back sanitized text.

use crate::quadrant::QuadrantKey;
use crate::sanitize::{is_valid_task_text, sanitize_text, MAX_TEXT_LENGTH};

/// A validation failure; `.0` is the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub &'static str);

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

impl std::error::Error for ValidationError {}

/// Validated `POST /tasks` payload with sanitized text.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTask {
    pub text: String,
    pub quadrant: QuadrantKey,
}

/// Validated `PATCH /tasks/:id` payload; at least one field is set.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateTask {
    pub text: Option<String>,
    pub quadrant: Option<QuadrantKey>,
}

/// Validate a create request. Sanitization can only shrink text, so the
/// length cap is rechecked afterwards.
pub fn validate_create(
    text: Option<&str>,
    quadrant: Option<&str>,
) -> Result<CreateTask, ValidationError> {
    let raw = text.ok_or(ValidationError("Text is required"))?;
    if raw.is_empty() {
        return Err(ValidationError("Text is required"));
    }
    if raw.chars().count() > MAX_TEXT_LENGTH {
        return Err(ValidationError("Text too long"));
    }
    let quadrant = quadrant
        .and_then(QuadrantKey::from_str)
        .ok_or(ValidationError("Valid quadrant is required"))?;

    let sanitized = sanitize_text(raw);
    if !is_valid_task_text(&sanitized) {
        return Err(ValidationError("Text is required"));
    }

    Ok(CreateTask { text: sanitized, quadrant })
}

/// Validate an update request. Each supplied field is checked independently;
/// supplying neither is the cross-field violation.
pub fn validate_update(
    text: Option<&str>,
    quadrant: Option<&str>,
) -> Result<UpdateTask, ValidationError> {
    if text.is_none() && quadrant.is_none() {
        return Err(ValidationError("At least one field must be provided"));
    }

    let text = match text {
        None => None,
        Some(raw) => {
            if raw.is_empty() {
                return Err(ValidationError("Text cannot be empty"));
            }
            if raw.chars().count() > MAX_TEXT_LENGTH {
                return Err(ValidationError("Text too long"));
            }
            let sanitized = sanitize_text(raw);
            if !is_valid_task_text(&sanitized) {
                return Err(ValidationError("Text cannot be empty"));
            }
            Some(sanitized)
        }
    };

    let quadrant = match quadrant {
        None => None,
        Some(raw) => Some(QuadrantKey::from_str(raw).ok_or(ValidationError("Invalid quadrant"))?),
    };

    Ok(UpdateTask { text, quadrant })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_text() {
        assert_eq!(validate_create(None, Some("urgentImportant")).unwrap_err().0, "Text is required");
        assert_eq!(validate_create(Some(""), Some("urgentImportant")).unwrap_err().0, "Text is required");
    }

    #[test]
    fn create_rejects_overlong_raw_text() {
        let long = "a".repeat(MAX_TEXT_LENGTH + 1);
        assert_eq!(
            validate_create(Some(&long), Some("urgentImportant")).unwrap_err().0,
            "Text too long"
        );
    }

    #[test]
    fn create_requires_valid_quadrant() {
        assert_eq!(validate_create(Some("x"), None).unwrap_err().0, "Valid quadrant is required");
        assert_eq!(
            validate_create(Some("x"), Some("bogus")).unwrap_err().0,
            "Valid quadrant is required"
        );
    }

    #[test]
    fn create_rejects_text_that_sanitizes_to_nothing() {
        assert_eq!(
            validate_create(Some("<b></b>"), Some("urgentImportant")).unwrap_err().0,
            "Text is required"
        );
    }

    #[test]
    fn create_returns_sanitized_text() {
        let ok = validate_create(Some("  <b>Buy milk</b>  "), Some("urgentImportant")).unwrap();
        assert_eq!(ok.text, "Buy milk");
        assert_eq!(ok.quadrant, QuadrantKey::UrgentImportant);
    }

    #[test]
    fn update_needs_at_least_one_field() {
        assert_eq!(validate_update(None, None).unwrap_err().0, "At least one field must be provided");
    }

    #[test]
    fn update_checks_each_field_independently() {
        assert_eq!(validate_update(Some(""), None).unwrap_err().0, "Text cannot be empty");
        assert_eq!(validate_update(Some("   "), None).unwrap_err().0, "Text cannot be empty");
        assert_eq!(validate_update(None, Some("nope")).unwrap_err().0, "Invalid quadrant");

        let ok = validate_update(Some(" new  text "), Some("notUrgentImportant")).unwrap();
        assert_eq!(ok.text.as_deref(), Some("new text"));
        assert_eq!(ok.quadrant, Some(QuadrantKey::NotUrgentImportant));
    }

    #[test]
    fn update_with_single_field_is_valid() {
        let text_only = validate_update(Some("t"), None).unwrap();
        assert!(text_only.quadrant.is_none());
        let quad_only = validate_update(None, Some("urgentNotImportant")).unwrap();
        assert!(quad_only.text.is_none());
    }
}
