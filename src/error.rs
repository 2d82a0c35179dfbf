//! Unified client error model shared by the session manager, the request
//! pipeline and the typed endpoint wrappers.
//!
//! Nothing in this taxonomy is fatal: `InvalidCredentials` and
//! `AuthorizationExpired` are recoverable by re-authenticating, everything
//! else by retrying at the call site.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Login rejected by the auth service (bad identifier/password or an
    /// explicit `success:false` envelope).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// 401/403 on an authenticated call. By the time this reaches the caller
    /// the session has already been torn down and the login navigation fired.
    #[error("authorization expired (HTTP {status})")]
    AuthorizationExpired { status: u16 },

    /// Transport-level failure: connect refused, DNS, timeout.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(#[source] reqwest::Error),

    /// Any other 4xx/5xx carrying a domain message. Passed through untouched
    /// for page-level presentation.
    #[error("application error (HTTP {status}): {message}")]
    Application { status: u16, message: String },

    /// The server answered 2xx but the body did not decode into the expected
    /// shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Bad base URL or client construction failure.
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// True when the failure should be resolved by sending the user back
    /// through the login flow rather than retrying the call.
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            ApiError::InvalidCredentials | ApiError::AuthorizationExpired { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
