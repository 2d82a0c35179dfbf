//! Explicit request/response middleware. Stages transform every outgoing
//! request in registration order before transmission; hooks observe every
//! response status in registration order before the result reaches the
//! caller.

use std::sync::Arc;

use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode, Url};

/// One outgoing call, constructed per request and mutated only by pipeline
/// stages before it is handed to the transport.
#[derive(Debug, Clone)]
pub struct OutgoingRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<serde_json::Value>,
}

impl OutgoingRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self { method, url, headers: HeaderMap::new(), body: None }
    }
}

pub trait RequestStage: Send + Sync {
    fn apply(&self, req: &mut OutgoingRequest);
}

pub trait ResponseHook: Send + Sync {
    fn on_status(&self, url: &Url, status: StatusCode);
}

#[derive(Clone, Default)]
pub struct Pipeline {
    stages: Vec<Arc<dyn RequestStage>>,
    hooks: Vec<Arc<dyn ResponseHook>>,
}

impl Pipeline {
    pub fn stage(mut self, stage: Arc<dyn RequestStage>) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn hook(mut self, hook: Arc<dyn ResponseHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn prepare(&self, req: &mut OutgoingRequest) {
        for stage in &self.stages {
            stage.apply(req);
        }
    }

    pub fn observe(&self, url: &Url, status: StatusCode) {
        for hook in &self.hooks {
            hook.on_status(url, status);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderName, HeaderValue};

    struct Append(&'static str);

    impl RequestStage for Append {
        fn apply(&self, req: &mut OutgoingRequest) {
            let prev = req
                .headers
                .get("x-trace")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_string();
            let next = format!("{prev}{}", self.0);
            req.headers.insert(
                HeaderName::from_static("x-trace"),
                HeaderValue::from_str(&next).unwrap(),
            );
        }
    }

    #[test]
    fn stages_run_in_registration_order() {
        let pipeline = Pipeline::default()
            .stage(Arc::new(Append("a")))
            .stage(Arc::new(Append("b")));
        let mut req = OutgoingRequest::new(
            Method::GET,
            Url::parse("http://localhost/api/admin/users").unwrap(),
        );
        pipeline.prepare(&mut req);
        assert_eq!(req.headers.get("x-trace").unwrap(), "ab");
    }
}
