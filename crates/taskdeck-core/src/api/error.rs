use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized - token may be expired")]
    Unauthorized,

    #[error("Payment failed: {0}")]
    PaymentRequired(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    UnprocessableEntity(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// FastAPI error body. `detail` is a plain string for application errors and
/// a list of `{msg, ...}` objects for request-validation errors.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: DetailField,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DetailField {
    Message(String),
    Items(Vec<DetailItem>),
}

#[derive(Debug, Deserialize)]
struct DetailItem {
    msg: String,
}

impl ApiError {
    /// Pull a human-readable message out of a response body, falling back to
    /// the (truncated) raw body when it is not the expected JSON shape.
    fn detail_from_body(body: &str) -> String {
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => match parsed.detail {
                DetailField::Message(msg) => msg,
                DetailField::Items(items) => items
                    .into_iter()
                    .map(|i| i.msg)
                    .collect::<Vec<_>>()
                    .join(", "),
            },
            Err(_) => Self::truncate_body(body),
        }
    }

    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            format!(
                "{}... (truncated, {} total bytes)",
                &body[..MAX_ERROR_BODY_LENGTH],
                body.len()
            )
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let detail = Self::detail_from_body(body);
        match status.as_u16() {
            400 => ApiError::BadRequest(detail),
            401 => ApiError::Unauthorized,
            402 => ApiError::PaymentRequired(detail),
            403 => ApiError::AccessDenied(detail),
            404 => ApiError::NotFound(detail),
            422 => ApiError::UnprocessableEntity(detail),
            500..=599 => ApiError::ServerError(detail),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, detail)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn string_detail_is_extracted() {
        let err = ApiError::from_status(
            StatusCode::BAD_REQUEST,
            r#"{"detail": "Email already registered."}"#,
        );
        match err {
            ApiError::BadRequest(msg) => assert_eq!(msg, "Email already registered."),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn list_detail_is_joined() {
        let body = r#"{"detail": [{"loc": ["body", "email"], "msg": "value is not a valid email address", "type": "value_error"}, {"loc": ["body", "password"], "msg": "field required", "type": "value_error.missing"}]}"#;
        let err = ApiError::from_status(StatusCode::UNPROCESSABLE_ENTITY, body);
        match err {
            ApiError::UnprocessableEntity(msg) => {
                assert_eq!(msg, "value is not a valid email address, field required")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn status_mapping() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::PAYMENT_REQUIRED, r#"{"detail": "Payment failed."}"#),
            ApiError::PaymentRequired(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN, r#"{"detail": "no"}"#),
            ApiError::AccessDenied(_)
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
    fn non_json_body_is_truncated() {
        let body = "x".repeat(600);
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, &body);
        match err {
            ApiError::ServerError(msg) => {
                assert!(msg.contains("truncated"));
                assert!(msg.contains("600 total bytes"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
