//! Bearer-token request authorizer: attaches the session token to every
//! non-auth call, and tears the session down when the backend answers
//! 401/403 so the caller's error handler always sees an anonymous session.

use std::sync::Arc;

use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{StatusCode, Url};

use crate::identity::SessionManager;

use super::pipeline::{OutgoingRequest, RequestStage, ResponseHook};

/// Auth endpoints (login/register/refresh) must work without a pre-existing
/// session and never trigger teardown on rejection.
pub fn is_auth_endpoint(url: &Url) -> bool {
    url.path().contains("/auth/")
}

pub struct BearerStage {
    session: Arc<SessionManager>,
}

impl BearerStage {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self { session }
    }
}

impl RequestStage for BearerStage {
    fn apply(&self, req: &mut OutgoingRequest) {
        if is_auth_endpoint(&req.url) {
            return;
        }
        let Some(token) = self.session.current_token() else {
            // No session: send unmodified and let the server reject it.
            return;
        };
        match HeaderValue::from_str(&format!("Bearer {token}")) {
            Ok(value) => {
                req.headers.insert(AUTHORIZATION, value);
            }
            Err(_) => {
                tracing::warn!("authorizer.bearer url={} err=token_not_header_safe", req.url)
            }
        }
    }
}

pub struct AuthFailureHook {
    session: Arc<SessionManager>,
}

impl AuthFailureHook {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self { session }
    }
}

impl ResponseHook for AuthFailureHook {
    fn on_status(&self, url: &Url, status: StatusCode) {
        if is_auth_endpoint(url) {
            return;
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::warn!("authorizer.reject url={url} status={}", status.as_u16());
            self.session.logout();
        }
    }
}
