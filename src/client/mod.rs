//! HTTP client layer: the request pipeline, the bearer-token authorizer and
//! the thin JSON wrapper the portal pages call through.

pub mod authorizer;
pub mod endpoints;
pub mod http;
pub mod pipeline;

pub use authorizer::{is_auth_endpoint, AuthFailureHook, BearerStage};
pub use http::ApiClient;
pub use pipeline::{OutgoingRequest, Pipeline, RequestStage, ResponseHook};
