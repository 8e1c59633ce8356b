use std::path::PathBuf;

use miette::Diagnostic;
use reqwest::StatusCode;
use reqwest::header::InvalidHeaderValue;
use serde::Deserialize;
use thiserror::Error;
use tracing_error::SpanTrace;

/// Error body returned by both the OAuth server and the invoice API.
///
/// Every key is optional: a body that is missing a key, or that is not JSON at
/// all, decodes to empty strings instead of failing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoteErrorResponse {
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub error_description: String,
}

impl RemoteErrorResponse {
    /// Leniently decodes an error body.
    #[must_use]
    pub fn from_body(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_else(|e| {
            debug!("error body is not a JSON error object: {}", e);
            Self::default()
        })
    }
}

/// Errors that can occur when interacting with the Chorus Pro API.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("invalid argument: {0}")]
    #[diagnostic(
        code(chorus_pro_rs::invalid_argument),
        help("Check the value passed to the client or the request")
    )]
    InvalidArgument(String),

    #[error("file not found: {}", path.display())]
    #[diagnostic(
        code(chorus_pro_rs::not_found),
        help("Verify that the flux file exists and is readable")
    )]
    NotFound { path: PathBuf },

    #[error("you must provide a value for field `{field}`")]
    #[diagnostic(
        code(chorus_pro_rs::missing_field),
        help("Set every required field of the request before executing it")
    )]
    MissingField { field: &'static str },

    /// A non-200 response from the OAuth token endpoint.
    #[error("{error}: {description}")]
    #[diagnostic(
        code(chorus_pro_rs::auth_error),
        help("Verify your OAuth client id and secret, and that they match the selected environment")
    )]
    Auth {
        status: StatusCode,
        error: String,
        description: String,
        response_body: Option<String>,
        span_trace: SpanTrace,
    },

    /// A non-200 response from the invoice API.
    #[error("{error}: {description}")]
    #[diagnostic(
        code(chorus_pro_rs::api_error),
        help("Check the bearer token, the Chorus Pro account credentials and the request fields")
    )]
    Api {
        status: StatusCode,
        error: String,
        description: String,
        response_body: Option<String>,
        span_trace: SpanTrace,
    },

    #[error("error making request: {0:?}")]
    #[diagnostic(
        code(chorus_pro_rs::request_error),
        help("Check your network connection and Chorus Pro availability")
    )]
    Request(#[source] reqwest::Error),

    #[error("error reading file: {0}")]
    #[diagnostic(code(chorus_pro_rs::io_error))]
    Io(#[source] std::io::Error),

    #[error("error decoding response: {0:?}")]
    #[diagnostic(
        code(chorus_pro_rs::deserialization_error),
        help("The API returned data in an unexpected format")
    )]
    DeserializationError(#[source] serde_json::Error, Option<String>),

    #[error("invalid header value")]
    #[diagnostic(
        code(chorus_pro_rs::invalid_header),
        help("Bearer tokens and account credentials must be visible ASCII")
    )]
    InvalidHeader(#[source] InvalidHeaderValue),

    #[error("environment variable {0} is not set")]
    #[diagnostic(code(chorus_pro_rs::environment))]
    Environment(String),
}

impl Error {
    pub(crate) fn auth(status: StatusCode, body: String) -> Self {
        let remote = RemoteErrorResponse::from_body(&body);
        Self::Auth {
            status,
            error: remote.error,
            description: remote.error_description,
            response_body: Some(body),
            span_trace: SpanTrace::capture(),
        }
    }

    pub(crate) fn api(status: StatusCode, body: String) -> Self {
        let remote = RemoteErrorResponse::from_body(&body);
        Self::Api {
            status,
            error: remote.error,
            description: remote.error_description,
            response_body: Some(body),
            span_trace: SpanTrace::capture(),
        }
    }

    /// The HTTP status code of a remote error.
    #[must_use]
    pub fn code(&self) -> Option<u16> {
        match self {
            Self::Auth { status, .. } | Self::Api { status, .. } => Some(status.as_u16()),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The span trace captured when a remote error was created.
    #[must_use]
    pub fn span_trace(&self) -> Option<&SpanTrace> {
        match self {
            Self::Auth { span_trace, .. } | Self::Api { span_trace, .. } => Some(span_trace),
            _ => None,
        }
    }

    /// The raw response body, when the error came from the server.
    #[must_use]
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Self::Auth { response_body, .. } | Self::Api { response_body, .. } => {
                response_body.as_deref()
            }
            Self::DeserializationError(_, body) => body.as_deref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Request(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::DeserializationError(e, None)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<InvalidHeaderValue> for Error {
    fn from(e: InvalidHeaderValue) -> Self {
        Self::InvalidHeader(e)
    }
}

/// Type alias for results from this crate.
///
/// This is already a Miette diagnostic result due to the implementation of
/// the Diagnostic trait for the Error type.
pub type Result<O> = std::result::Result<O, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_error_message_joins_code_and_description() {
        let err = Error::api(
            StatusCode::BAD_REQUEST,
            r#"{"error":"invalid_request","error_description":"bad flux"}"#.to_string(),
        );
        assert_eq!(err.to_string(), "invalid_request: bad flux");
        assert_eq!(err.code(), Some(400));
    }

    #[test]
    fn missing_keys_degrade_to_empty_strings() {
        let err = Error::auth(
            StatusCode::UNAUTHORIZED,
            r#"{"error":"invalid_client"}"#.to_string(),
        );
        match &err {
            Error::Auth {
                error, description, ..
            } => {
                assert_eq!(error, "invalid_client");
                assert!(description.is_empty());
            }
            other => panic!("expected Auth error, got {other:?}"),
        }
        assert_eq!(err.code(), Some(401));
    }

    #[test]
    fn non_json_body_does_not_fail() {
        let err = Error::api(StatusCode::BAD_GATEWAY, "<html>Bad Gateway</html>".to_string());
        assert_eq!(err.to_string(), ": ");
        assert_eq!(err.code(), Some(502));
        assert_eq!(err.response_body(), Some("<html>Bad Gateway</html>"));
    }
}
