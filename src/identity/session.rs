use std::sync::Arc;

use parking_lot::RwLock;
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};

use crate::client::endpoints;
use crate::config::ClientConfig;
use crate::error::{ApiError, Result};

use super::principal::Principal;
use super::store::{StoredTokens, TokenStore};

/// In-memory record of the current login. An access token held here is the
/// single source of truth for "logged in".
#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Absent when the session was restored from the token store; the
    /// original portal persists only the token pair across reloads.
    pub principal: Option<Principal>,
}

/// Injection point for the "send the user back to the login surface" side
/// effect. Fired on explicit logout and on authorization failure, once per
/// AUTHENTICATED -> ANONYMOUS transition.
pub trait LoginNavigator: Send + Sync {
    fn to_login(&self);
}

type UserListener = Box<dyn Fn(Option<&Principal>) + Send + Sync>;

#[derive(Debug, Serialize)]
struct LoginBody<'a> {
    identifier: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct AuthEnvelope {
    success: bool,
    data: Option<AuthData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthData {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    user: Option<Principal>,
}

/// Owns the session slot. Components read it (never mutate it); every
/// mutation goes through `login` / `logout` here.
pub struct SessionManager {
    base: Url,
    http: reqwest::Client,
    slot: RwLock<Option<Session>>,
    store: Arc<dyn TokenStore>,
    listeners: RwLock<Vec<UserListener>>,
    navigator: RwLock<Option<Arc<dyn LoginNavigator>>>,
}

impl SessionManager {
    /// Builds the manager and restores a persisted token pair, if any, so a
    /// restarted client resumes as AUTHENTICATED without a principal.
    pub fn new(cfg: &ClientConfig, store: Arc<dyn TokenStore>) -> Result<Arc<Self>> {
        let base = Url::parse(&cfg.base_url)
            .map_err(|e| ApiError::Config(format!("invalid base URL {}: {e}", cfg.base_url)))?;
        let http = reqwest::Client::builder()
            .timeout(cfg.timeout())
            .build()
            .map_err(|e| ApiError::Config(format!("http client: {e}")))?;

        let restored = store.load().map(|t| Session {
            access_token: t.access_token,
            refresh_token: t.refresh_token,
            principal: None,
        });
        if restored.is_some() {
            tracing::info!("session.restore base={base}");
        }

        Ok(Arc::new(Self {
            base,
            http,
            slot: RwLock::new(restored),
            store,
            listeners: RwLock::new(Vec::new()),
            navigator: RwLock::new(None),
        }))
    }

    /// Exchanges credentials for a token pair at the auth service. On any
    /// failure the session state is left untouched — no partial session.
    pub async fn login(&self, identifier: &str, secret: &str) -> Result<Session> {
        let url = self
            .base
            .join(endpoints::AUTH_LOGIN)
            .map_err(|e| ApiError::Config(format!("login URL: {e}")))?;
        let resp = self
            .http
            .post(url)
            .json(&LoginBody { identifier, password: secret })
            .send()
            .await
            .map_err(ApiError::ServiceUnavailable)?;

        let status = resp.status();
        if status.is_client_error() {
            tracing::warn!("auth.login user={identifier} status={}", status.as_u16());
            return Err(ApiError::InvalidCredentials);
        }
        if let Err(e) = resp.error_for_status_ref() {
            return Err(ApiError::ServiceUnavailable(e));
        }

        let envelope: AuthEnvelope = resp
            .json()
            .await
            .map_err(|e| ApiError::MalformedResponse(e.to_string()))?;
        let data = match envelope {
            AuthEnvelope { success: true, data: Some(d) } => d,
            _ => {
                tracing::warn!("auth.login user={identifier} status=rejected");
                return Err(ApiError::InvalidCredentials);
            }
        };

        let session = Session {
            access_token: data.access_token,
            refresh_token: data.refresh_token,
            principal: data.user,
        };
        self.install(session.clone());
        tracing::info!("auth.login user={identifier} status=ok");
        Ok(session)
    }

    /// Clears all session fields and fires the login navigation. Idempotent:
    /// a no-op when already anonymous, so concurrent authorization failures
    /// from parallel requests navigate at most once.
    pub fn logout(&self) {
        let had = self.slot.write().take();
        if had.is_none() {
            return;
        }
        self.store.clear();
        tracing::info!("session.clear");
        self.notify(None);
        let nav = self.navigator.read().clone();
        if let Some(nav) = nav {
            nav.to_login();
        }
    }

    /// Best-effort server-side invalidation, then local teardown. A failed
    /// or unreachable logout endpoint never blocks clearing the session.
    pub async fn logout_remote(&self) {
        if let Some(token) = self.current_token() {
            match self.base.join(endpoints::AUTH_LOGOUT) {
                Ok(url) => {
                    let sent = self.http.post(url).bearer_auth(&token).send().await;
                    match sent {
                        Ok(resp) if resp.status() == StatusCode::OK => {}
                        Ok(resp) => {
                            tracing::warn!("auth.logout status={}", resp.status().as_u16())
                        }
                        Err(e) => tracing::warn!("auth.logout err={e}"),
                    }
                }
                Err(e) => tracing::warn!("auth.logout err={e}"),
            }
        }
        self.logout();
    }

    /// Local state check only; cannot see server-side token expiry.
    pub fn is_logged_in(&self) -> bool {
        self.slot.read().is_some()
    }

    /// Token accessor for the request authorizer. Not for display code: keep
    /// tokens out of rendered output and log lines.
    pub fn current_token(&self) -> Option<String> {
        self.slot.read().as_ref().map(|s| s.access_token.clone())
    }

    pub fn current_user(&self) -> Option<Principal> {
        self.slot.read().as_ref().and_then(|s| s.principal.clone())
    }

    /// Registers a current-user-changed callback. Fired with the new
    /// principal on login and with `None` on teardown.
    pub fn on_user_changed(&self, listener: impl Fn(Option<&Principal>) + Send + Sync + 'static) {
        self.listeners.write().push(Box::new(listener));
    }

    pub fn set_navigator(&self, navigator: Arc<dyn LoginNavigator>) {
        *self.navigator.write() = Some(navigator);
    }

    fn install(&self, session: Session) {
        self.store
            .save(&StoredTokens::new(session.access_token.clone(), session.refresh_token.clone()));
        let principal = session.principal.clone();
        *self.slot.write() = Some(session);
        self.notify(principal.as_ref());
    }

    fn notify(&self, principal: Option<&Principal>) {
        for listener in self.listeners.read().iter() {
            listener(principal);
        }
    }
}
