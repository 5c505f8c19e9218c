use std::fmt;

use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use thiserror::Error;
use url::Url;

/// Top-level error type for the `unified-api` crate.
///
/// Every request path (login, resource lists, commands, raw streaming)
/// reports failures through this one enum. The CLI maps it onto
/// user-facing diagnostics and exit codes.
#[derive(Debug, Error)]
pub enum Error {
    // ── Local validation ────────────────────────────────────────────
    /// Argument rejected before any request was sent.
    #[error("Invalid argument {argument}: {reason}")]
    InvalidArgument {
        argument: &'static str,
        reason: String,
    },

    /// A site-scoped request was attempted before `login` succeeded.
    #[error("Not logged in -- call login before issuing requests")]
    NotLoggedIn,

    // ── Authentication ──────────────────────────────────────────────
    /// Login returned 2xx but the controller did not issue a session.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate loading error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Controller responses ────────────────────────────────────────
    /// Non-2xx response from the controller.
    #[error("{0}")]
    Api(Box<ApiError>),

    /// 2xx response whose `meta.rc` was not `"ok"`.
    #[error("Controller rejected request: {message}")]
    Rejected { message: String },

    /// A single-item lookup came back empty.
    #[error("{resource} not found: {identifier}")]
    NotFound {
        resource: &'static str,
        identifier: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// Request body could not be serialized.
    #[error("Encoding error: {0}")]
    Encode(#[source] serde_json::Error),

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Decode { message: String, body: String },

    /// Writing a streamed response body failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns `true` if the controller refused our credentials or session.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            Self::Authentication { .. } | Self::NotLoggedIn => true,
            Self::Api(api) => matches!(
                api.status,
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
            ),
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error, local or remote.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Api(api) => api.status == StatusCode::NOT_FOUND,
            _ => false,
        }
    }

    /// HTTP status associated with this error, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api(api) => Some(api.status),
            Self::Transport(e) => e.status(),
            _ => None,
        }
    }
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        Self::Api(Box::new(err))
    }
}

/// Details of a non-2xx controller response.
#[derive(Debug)]
pub struct ApiError {
    pub method: Method,
    pub url: Url,
    pub status: StatusCode,
    pub message: String,
    pub request_id: String,
    pub headers: HeaderMap,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {} (request {:?}) {}",
            self.method,
            self.url,
            self.status.as_u16(),
            self.request_id,
            self.message
        )
    }
}

impl std::error::Error for ApiError {}
