//! Error types for Canvas API operations.

use std::io;
use std::path::PathBuf;

use reqwest::{Method, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Upper bound on the number of body characters carried into error messages.
const BODY_EXCERPT_CHARS: usize = 200;

/// Primary error type for client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The token file could not be read.
    #[error("failed to read access token from {}", .path.display())]
    TokenUnreadable {
        /// Location that was read.
        path: PathBuf,
        /// Source IO error.
        source: io::Error,
    },
    /// The token source held nothing but whitespace.
    #[error("access token from {origin} is empty")]
    TokenEmpty {
        /// Where the token came from (a path or "command line").
        origin: String,
    },
    /// No home directory is available to resolve the default token path.
    #[error("cannot locate home directory to resolve {path}")]
    HomeDirectoryUnavailable {
        /// Path that required home expansion.
        path: String,
    },
    /// The configured base URL cannot address the API.
    #[error("invalid base URL '{value}': {reason}")]
    InvalidBaseUrl {
        /// Offending input.
        value: String,
        /// Human-readable reason.
        reason: String,
    },
    /// The underlying HTTP client could not be constructed.
    #[error("failed to build HTTP client")]
    HttpClient {
        /// Source reqwest error.
        source: reqwest::Error,
    },
    /// An endpoint path could not be placed under the base URL.
    #[error("cannot address endpoint '{path}' under the base URL")]
    InvalidEndpoint {
        /// Path relative to the base URL.
        path: String,
    },
    /// The server answered with a non-success status.
    #[error("{method} {url} returned {status}: {}", excerpt(.body))]
    Status {
        /// Request method.
        method: Method,
        /// Request URL.
        url: Url,
        /// Response status.
        status: StatusCode,
        /// Raw response body.
        body: String,
    },
    /// The request never produced a response.
    #[error("{method} {url} failed")]
    Transport {
        /// Request method.
        method: Method,
        /// Request URL.
        url: Url,
        /// Source reqwest error.
        source: reqwest::Error,
    },
    /// The response body was not the JSON shape expected.
    #[error("{method} {url} returned malformed JSON")]
    Decode {
        /// Request method.
        method: Method,
        /// Request URL.
        url: Url,
        /// Source serde error.
        source: serde_json::Error,
    },
    /// A pagination link pointed away from the configured server.
    #[error("refusing to follow pagination link {link} outside {base}")]
    ForeignPageLink {
        /// Link offered by the server.
        link: Url,
        /// Configured base URL.
        base: Url,
    },
}

/// Coarse classification of a [`ClientError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Local setup problem: token, base URL, client construction.
    Configuration,
    /// The remote call failed: status, transport, decoding.
    Remote,
}

impl ClientError {
    /// Classify the error as a configuration or remote failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::TokenUnreadable { .. }
            | Self::TokenEmpty { .. }
            | Self::HomeDirectoryUnavailable { .. }
            | Self::InvalidBaseUrl { .. }
            | Self::HttpClient { .. }
            | Self::InvalidEndpoint { .. } => ErrorKind::Configuration,
            Self::Status { .. }
            | Self::Transport { .. }
            | Self::Decode { .. }
            | Self::ForeignPageLink { .. } => ErrorKind::Remote,
        }
    }

    /// HTTP status reported by the server, if the failure carried one.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Raw response body of a status failure.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Convenience alias for client results.
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Deserialize)]
struct CanvasErrors {
    errors: Vec<CanvasErrorMessage>,
}

#[derive(Deserialize)]
struct CanvasErrorMessage {
    message: String,
}

/// Canvas reports failures as `{"errors": [{"message": ...}]}`; prefer those
/// messages and fall back to a bounded slice of the raw body.
fn excerpt(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<CanvasErrors>(body) {
        if !parsed.errors.is_empty() {
            return parsed
                .errors
                .into_iter()
                .map(|error| error.message)
                .collect::<Vec<_>>()
                .join("; ");
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }
    if trimmed.chars().count() <= BODY_EXCERPT_CHARS {
        return trimmed.to_string();
    }
    let mut clipped: String = trimmed.chars().take(BODY_EXCERPT_CHARS).collect();
    clipped.push_str("...");
    clipped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_error(status: StatusCode, body: &str) -> ClientError {
        ClientError::Status {
            method: Method::GET,
            url: Url::parse("https://canvas.example.edu/api/v1/courses/1").expect("url"),
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn status_errors_are_remote_and_expose_status() {
        let err = status_error(StatusCode::NOT_FOUND, "{}");
        assert_eq!(err.kind(), ErrorKind::Remote);
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.body(), Some("{}"));
    }

    #[test]
    fn token_errors_are_configuration() {
        let err = ClientError::TokenEmpty {
            origin: "command line".into(),
        };
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.status().is_none());
    }

    #[test]
    fn status_message_prefers_canvas_error_messages() {
        let err = status_error(
            StatusCode::UNAUTHORIZED,
            r#"{"errors":[{"message":"Invalid access token."}]}"#,
        );
        let rendered = err.to_string();
        assert!(rendered.contains("401 Unauthorized"));
        assert!(rendered.ends_with("Invalid access token."));
    }

    #[test]
    fn status_message_clips_long_bodies() {
        let body = "x".repeat(500);
        let rendered = excerpt(&body);
        assert_eq!(rendered.len(), BODY_EXCERPT_CHARS + 3);
        assert!(rendered.ends_with("..."));
        assert_eq!(excerpt("  "), "<empty body>");
    }
}
