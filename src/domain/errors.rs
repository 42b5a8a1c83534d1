use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Field name to validation messages, as sent with a 422.
pub type FieldErrors = HashMap<String, Vec<String>>;

// Status used when the call failed before any response arrived.
pub const NO_STATUS: u16 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    BadRequest,
    AuthenticationLost,
    Forbidden,
    NotFound,
    ValidationFailed,
    RateLimited,
    ServerError,
    Unexpected,
    NetworkOrTimeout,
    // Request could not be encoded or a 2xx body did not match the expected shape.
    InvalidPayload,
}

impl ApiErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => ApiErrorKind::BadRequest,
            401 => ApiErrorKind::AuthenticationLost,
            403 => ApiErrorKind::Forbidden,
            404 => ApiErrorKind::NotFound,
            422 => ApiErrorKind::ValidationFailed,
            429 => ApiErrorKind::RateLimited,
            500..=599 => ApiErrorKind::ServerError,
            _ => ApiErrorKind::Unexpected,
        }
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ApiErrorKind::BadRequest => "bad request",
            ApiErrorKind::AuthenticationLost => "authentication lost",
            ApiErrorKind::Forbidden => "forbidden",
            ApiErrorKind::NotFound => "not found",
            ApiErrorKind::ValidationFailed => "validation failed",
            ApiErrorKind::RateLimited => "rate limited",
            ApiErrorKind::ServerError => "server error",
            ApiErrorKind::Unexpected => "unexpected response",
            ApiErrorKind::NetworkOrTimeout => "network or timeout",
            ApiErrorKind::InvalidPayload => "invalid payload",
        };
        f.write_str(name)
    }
}

/// Normalized failure for any upstream call.
///
/// Built once from the raw status and body; fields are read-only afterwards.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} ({status_code}): {message}")]
pub struct ApiError {
    kind: ApiErrorKind,
    message: String,
    status_code: u16,
    data: Option<Value>,
    errors: Option<FieldErrors>,
}

impl ApiError {
    /// Map a non-2xx response into the normalized shape.
    pub fn from_response(status: u16, body: Option<Value>) -> Self {
        let kind = ApiErrorKind::from_status(status);
        let body_ref = body.as_ref();

        let message = match kind {
            ApiErrorKind::AuthenticationLost => "Authentication required".to_string(),
            ApiErrorKind::Forbidden => "Access forbidden".to_string(),
            ApiErrorKind::NotFound => "Resource not found".to_string(),
            ApiErrorKind::ValidationFailed => "Validation error".to_string(),
            ApiErrorKind::RateLimited => "Too many requests".to_string(),
            ApiErrorKind::BadRequest => upstream_message(body_ref).unwrap_or("Bad request").to_string(),
            ApiErrorKind::ServerError => upstream_message(body_ref).unwrap_or("Server error").to_string(),
            _ => upstream_message(body_ref)
                .unwrap_or("An unexpected error occurred")
                .to_string(),
        };

        let errors = match kind {
            ApiErrorKind::ValidationFailed => body_ref.and_then(field_errors),
            _ => None,
        };

        Self {
            kind,
            message,
            status_code: status,
            data: body,
            errors,
        }
    }

    pub fn network(detail: impl fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::NetworkOrTimeout,
            message: format!("Network error: {detail}"),
            status_code: NO_STATUS,
            data: None,
            errors: None,
        }
    }

    pub fn timeout() -> Self {
        Self {
            kind: ApiErrorKind::NetworkOrTimeout,
            message: "Request timed out".to_string(),
            status_code: NO_STATUS,
            data: None,
            errors: None,
        }
    }

    pub fn invalid_payload(status_code: u16, detail: impl fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::InvalidPayload,
            message: format!("Invalid payload: {detail}"),
            status_code,
            data: None,
            errors: None,
        }
    }

    pub fn kind(&self) -> ApiErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status, or `NO_STATUS` when no response was received.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Raw response body, JSON or text.
    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    pub fn errors(&self) -> Option<&FieldErrors> {
        self.errors.as_ref()
    }

    pub fn is_authentication_lost(&self) -> bool {
        self.kind == ApiErrorKind::AuthenticationLost
    }
}

// Prefer the body's `error` field, then `message`; empty strings don't count.
fn upstream_message(body: Option<&Value>) -> Option<&str> {
    let body = body?;
    ["error", "message"]
        .into_iter()
        .filter_map(|field| body.get(field).and_then(Value::as_str))
        .find(|text| !text.is_empty())
}

fn field_errors(body: &Value) -> Option<FieldErrors> {
    let map = body.get("errors")?.as_object()?;
    let errors = map
        .iter()
        .map(|(field, messages)| {
            let messages = match messages {
                Value::Array(items) => items
                    .iter()
                    .map(|item| match item {
                        Value::String(text) => text.clone(),
                        other => other.to_string(),
                    })
                    .collect(),
                Value::String(text) => vec![text.clone()],
                other => vec![other.to_string()],
            };
            (field.clone(), messages)
        })
        .collect();
    Some(errors)
}

#[derive(Debug, Error)]
pub enum CookieJarError {
    #[error("cookie jar io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cookie jar decode error: {0}")]
    Decode(#[from] toml::de::Error),
    #[error("cookie jar encode error: {0}")]
    Encode(#[from] toml::ser::Error),
    #[error("cookie jar lock poisoned")]
    Poisoned,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn when_status_is_listed_then_error_keeps_status_and_has_message() {
        for status in [400, 403, 404, 422, 429, 500, 502, 503, 504] {
            let error = ApiError::from_response(status, Some(json!({})));

            assert_eq!(error.status_code(), status);
            assert!(!error.message().is_empty(), "empty message for {status}");
        }
    }

    #[test]
    fn when_bad_request_has_error_field_then_it_wins_over_message() {
        let error = ApiError::from_response(
            400,
            Some(json!({ "error": "name is taken", "message": "ignored" })),
        );

        assert_eq!(error.kind(), ApiErrorKind::BadRequest);
        assert_eq!(error.message(), "name is taken");
    }

    #[test]
    fn when_bad_request_has_only_message_then_message_is_used() {
        let error = ApiError::from_response(400, Some(json!({ "message": "missing name" })));

        assert_eq!(error.message(), "missing name");
    }

    #[test]
    fn when_bad_request_error_field_is_empty_then_message_field_is_used() {
        let error =
            ApiError::from_response(400, Some(json!({ "error": "", "message": "missing name" })));

        assert_eq!(error.message(), "missing name");
    }

    #[test]
    fn when_bad_request_has_no_body_then_fallback_is_used() {
        let error = ApiError::from_response(400, None);

        assert_eq!(error.message(), "Bad request");
        assert_eq!(error.data(), None);
    }

    #[test]
    fn when_validation_fails_then_field_errors_are_copied() {
        let body = json!({
            "message": "The given data was invalid.",
            "errors": { "name": ["The name field is required."] }
        });

        let error = ApiError::from_response(422, Some(body.clone()));

        assert_eq!(error.kind(), ApiErrorKind::ValidationFailed);
        assert_eq!(error.message(), "Validation error");
        let errors = error.errors().expect("expected field errors");
        assert_eq!(
            errors.get("name"),
            Some(&vec!["The name field is required.".to_string()])
        );
        assert_eq!(error.data(), Some(&body));
    }

    #[test]
    fn when_validation_error_values_are_strings_then_they_become_single_item_lists() {
        let error = ApiError::from_response(422, Some(json!({ "errors": { "title": "too long" } })));

        let errors = error.errors().expect("expected field errors");
        assert_eq!(errors.get("title"), Some(&vec!["too long".to_string()]));
    }

    #[test]
    fn when_status_is_not_validation_then_errors_stay_empty() {
        let error = ApiError::from_response(400, Some(json!({ "errors": { "name": ["x"] } })));

        assert_eq!(error.errors(), None);
    }

    #[test]
    fn when_status_is_fixed_message_then_body_message_is_ignored() {
        let cases = [
            (401, ApiErrorKind::AuthenticationLost, "Authentication required"),
            (403, ApiErrorKind::Forbidden, "Access forbidden"),
            (404, ApiErrorKind::NotFound, "Resource not found"),
            (429, ApiErrorKind::RateLimited, "Too many requests"),
        ];

        for (status, kind, message) in cases {
            let error = ApiError::from_response(status, Some(json!({ "message": "upstream" })));
            assert_eq!(error.kind(), kind);
            assert_eq!(error.message(), message);
        }
    }

    #[test]
    fn when_server_fails_then_body_error_or_fallback_is_used() {
        let with_body = ApiError::from_response(502, Some(json!({ "error": "upstream down" })));
        let without_body = ApiError::from_response(503, None);
        let other_5xx = ApiError::from_response(501, None);

        assert_eq!(with_body.kind(), ApiErrorKind::ServerError);
        assert_eq!(with_body.message(), "upstream down");
        assert_eq!(without_body.message(), "Server error");
        assert_eq!(other_5xx.kind(), ApiErrorKind::ServerError);
    }

    #[test]
    fn when_status_is_unlisted_then_generic_fallback_is_used() {
        let error = ApiError::from_response(418, Some(Value::String("teapot".to_string())));

        assert_eq!(error.kind(), ApiErrorKind::Unexpected);
        assert_eq!(error.message(), "An unexpected error occurred");
        assert_eq!(error.data(), Some(&Value::String("teapot".to_string())));
    }

    #[test]
    fn when_transport_fails_then_no_status_is_recorded() {
        let error = ApiError::timeout();

        assert_eq!(error.kind(), ApiErrorKind::NetworkOrTimeout);
        assert_eq!(error.status_code(), NO_STATUS);
    }
}
