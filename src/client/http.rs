//! Thin JSON wrapper over the portal backend. Every call runs through the
//! pipeline: the bearer stage first, then any caller-registered stages;
//! response hooks run before the status is mapped to an error, so on 401/403
//! the session is already cleared when the caller's error handler runs.

use std::sync::Arc;

use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::identity::SessionManager;

use super::authorizer::{is_auth_endpoint, AuthFailureHook, BearerStage};
use super::pipeline::{OutgoingRequest, Pipeline};

pub struct ApiClient {
    base: Url,
    http: reqwest::Client,
    pipeline: Pipeline,
    session: Arc<SessionManager>,
}

impl ApiClient {
    /// Client with the default pipeline: bearer injection on the way out,
    /// session teardown on 401/403 on the way back.
    pub fn new(cfg: &ClientConfig, session: Arc<SessionManager>) -> Result<Self> {
        let pipeline = Pipeline::default()
            .stage(Arc::new(BearerStage::new(session.clone())))
            .hook(Arc::new(AuthFailureHook::new(session.clone())));
        Self::with_pipeline(cfg, session, pipeline)
    }

    /// Client with a caller-assembled pipeline. The caller owns ordering;
    /// `ApiClient::new` is the supported composition.
    pub fn with_pipeline(
        cfg: &ClientConfig,
        session: Arc<SessionManager>,
        pipeline: Pipeline,
    ) -> Result<Self> {
        let base = Url::parse(&cfg.base_url)
            .map_err(|e| ApiError::Config(format!("invalid base URL {}: {e}", cfg.base_url)))?;
        let http = reqwest::Client::builder()
            .timeout(cfg.timeout())
            .build()
            .map_err(|e| ApiError::Config(format!("http client: {e}")))?;
        Ok(Self { base, http, pipeline, session })
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        self.dispatch(Method::GET, endpoint, None).await
    }

    pub async fn get_with_params<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let mut url = self.build_url(endpoint)?;
        url.query_pairs_mut().extend_pairs(params);
        self.dispatch_url(Method::GET, url, None).await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &impl Serialize,
    ) -> Result<T> {
        self.dispatch(Method::POST, endpoint, Some(to_body(body)?)).await
    }

    pub async fn put<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &impl Serialize,
    ) -> Result<T> {
        self.dispatch(Method::PUT, endpoint, Some(to_body(body)?)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        self.dispatch(Method::DELETE, endpoint, None).await
    }

    /// Absolute endpoints pass through untouched; everything else joins onto
    /// the configured base.
    fn build_url(&self, endpoint: &str) -> Result<Url> {
        if endpoint.starts_with("http") {
            return Url::parse(endpoint)
                .map_err(|e| ApiError::Config(format!("invalid endpoint {endpoint}: {e}")));
        }
        self.base
            .join(endpoint)
            .map_err(|e| ApiError::Config(format!("invalid endpoint {endpoint}: {e}")))
    }

    async fn dispatch<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T> {
        let url = self.build_url(endpoint)?;
        self.dispatch_url(method, url, body).await
    }

    async fn dispatch_url<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<serde_json::Value>,
    ) -> Result<T> {
        let mut req = OutgoingRequest::new(method, url);
        req.body = body;
        self.pipeline.prepare(&mut req);

        let mut builder = self
            .http
            .request(req.method.clone(), req.url.clone())
            .headers(req.headers.clone());
        if let Some(body) = &req.body {
            builder = builder.json(body);
        }
        let resp = builder.send().await.map_err(ApiError::ServiceUnavailable)?;
        let status = resp.status();

        // Hooks must see the status before the caller does.
        self.pipeline.observe(&req.url, status);

        // A rejected call to an auth endpoint is a login failure, not an
        // expired session; only authenticated calls map to AuthorizationExpired.
        if (status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN)
            && !is_auth_endpoint(&req.url)
        {
            return Err(ApiError::AuthorizationExpired { status: status.as_u16() });
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!("api.error url={} status={}", req.url, status.as_u16());
            return Err(ApiError::Application {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }
        resp.json::<T>()
            .await
            .map_err(|e| ApiError::MalformedResponse(e.to_string()))
    }
}

fn to_body(body: &impl Serialize) -> Result<serde_json::Value> {
    serde_json::to_value(body)
        .map_err(|e| ApiError::Config(format!("request body did not serialize: {e}")))
}

/// Prefer the backend's own `{"message": ...}` envelope; fall back to the
/// status line.
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        })
}
