use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized - please log in again")]
    Unauthorized,

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies carried in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// The API wraps failures as `{"success": false, "message": "..."}`;
/// some paths use `"error"` instead.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default, alias = "error")]
    message: Option<String>,
}

impl ApiError {
    /// Pull the message field out of an error body when possible, otherwise
    /// fall back to the (truncated) raw body.
    fn extract_message(body: &str) -> String {
        if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
            if let Some(message) = parsed.message {
                if !message.is_empty() {
                    return message;
                }
            }
        }
        Self::truncate_body(body)
    }

    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        // Cut at a char boundary; a fixed byte offset can land inside a
        // multibyte character
        let mut cut = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        format!(
            "{}... (truncated, {} total bytes)",
            &body[..cut],
            body.len()
        )
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = Self::extract_message(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(message),
            404 => ApiError::NotFound(message),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(message),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn status_maps_to_variants() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, "gone"),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            ApiError::ServerError(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::IM_A_TEAPOT, ""),
            ApiError::InvalidResponse(_)
        ));
    }

    #[test]
    fn message_field_is_extracted_from_error_bodies() {
        let err = ApiError::from_status(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"success":false,"message":"Failed to search properties"}"#,
        );
        assert_eq!(
            err.to_string(),
            "Server error: Failed to search properties"
        );

        // "error" alias
        let err = ApiError::from_status(
            StatusCode::FORBIDDEN,
            r#"{"error":"tenants cannot do that"}"#,
        );
        assert_eq!(err.to_string(), "Access denied: tenants cannot do that");
    }

    #[test]
    fn non_json_bodies_fall_back_to_raw_text() {
        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, "upstream fell over");
        assert_eq!(err.to_string(), "Server error: upstream fell over");
    }

    #[test]
    fn huge_bodies_are_truncated() {
        let body = "x".repeat(2000);
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, &body);
        let msg = err.to_string();
        assert!(msg.contains("truncated"));
        assert!(msg.len() < 700);
    }

    #[test]
    fn multibyte_bodies_truncate_at_a_char_boundary() {
        // 200 euro signs = 600 bytes; byte 500 falls inside a character
        let body = "\u{20ac}".repeat(200);
        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, &body);
        let msg = err.to_string();
        assert!(msg.contains("truncated"));
        assert!(msg.contains("600 total bytes"));
    }
}
