//! Error types for the API client.

use serde_json::Value;

use crate::error_shape::ErrorShape;

/// Errors that can occur when making API requests.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The request never completed (connection refused, TLS failure, body read error).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// A response declared as JSON could not be decoded.
    #[error("Failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),
    /// The API returned a non-success status with a body that is not JSON.
    #[error("HTTP error! status: {status}")]
    HttpStatus { status: u16 },
    /// The API returned a non-success status with a JSON error body.
    #[error("{0}")]
    Api(ApiError),
    /// Base URL and path did not combine into a valid URL.
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),
    /// A caller-supplied header name or value was rejected.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),
    /// The request body could not be serialized to JSON.
    #[error("Failed to serialize request body: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl Error {
    /// HTTP status attached to the failure, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status } => Some(*status),
            Self::Api(e) => Some(e.status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The decoded error body, only present for normalized API failures.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            Self::Api(e) => Some(&e.payload),
            _ => None,
        }
    }

    /// Returns the structured failure when this is a normalized API error.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }
}

/// A failing JSON response, normalized to a single message.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    /// Message derived from the body via [`ErrorShape`].
    pub message: String,
    /// HTTP status code of the response.
    pub status: u16,
    /// The full decoded error body.
    pub payload: Value,
}

impl ApiError {
    /// Builds the failure for `status` from a decoded JSON error body.
    pub fn from_body(status: u16, payload: Value) -> Self {
        let message = ErrorShape::classify(&payload).into_message(status);
        Self {
            message,
            status,
            payload,
        }
    }

    /// Which recognized backend shape the payload matched.
    pub fn shape(&self) -> ErrorShape<'_> {
        ErrorShape::classify(&self.payload)
    }

    /// Flattens a validation-error mapping into `(field, messages)` pairs.
    ///
    /// Only fields holding a string or an array are reported; the order is
    /// the order the server sent them in.
    pub fn field_errors(&self) -> Vec<(String, Vec<String>)> {
        let Some(map) = self.payload.as_object() else {
            return Vec::new();
        };
        map.iter()
            .filter_map(|(field, value)| match value {
                Value::String(s) => Some((field.clone(), vec![s.clone()])),
                Value::Array(items) if !items.is_empty() => Some((
                    field.clone(),
                    items
                        .iter()
                        .map(|item| match item {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        })
                        .collect(),
                )),
                _ => None,
            })
            .collect()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<ApiError> for Error {
    fn from(e: ApiError) -> Self {
        Self::Api(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn api_error_carries_status_and_payload() {
        let err: Error = ApiError::from_body(404, json!({"detail": "Not found."})).into();
        assert_eq!(err.to_string(), "Not found.");
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.payload(), Some(&json!({"detail": "Not found."})));
    }

    #[test]
    fn http_status_has_no_payload() {
        let err = Error::HttpStatus { status: 502 };
        assert!(err.to_string().contains("502"));
        assert_eq!(err.status(), Some(502));
        assert!(err.payload().is_none());
        assert!(err.as_api().is_none());
    }

    #[test]
    fn field_errors_flatten_in_server_order() {
        let err = ApiError::from_body(
            400,
            json!({
                "payee": ["This field is required.", "Too short."],
                "amount": "Must be positive.",
                "meta": {"nested": true},
                "tags": []
            }),
        );
        assert_eq!(
            err.field_errors(),
            vec![
                (
                    "payee".to_string(),
                    vec!["This field is required.".to_string(), "Too short.".to_string()]
                ),
                ("amount".to_string(), vec!["Must be positive.".to_string()]),
            ]
        );
    }

    #[test]
    fn field_errors_empty_for_non_object() {
        let err = ApiError::from_body(500, json!(["boom"]));
        assert!(err.field_errors().is_empty());
        assert!(err.message.contains("500"));
    }

    #[test]
    fn every_variant_displays_non_empty() {
        let errors = vec![
            Error::HttpStatus { status: 500 },
            Error::InvalidUrl("relative URL without a base".to_string()),
            Error::InvalidHeader("bad name".to_string()),
            Error::Api(ApiError::from_body(500, json!({}))),
        ];
        for err in errors {
            assert!(!err.to_string().is_empty());
        }
    }
}
