//! HTTP request execution.
//!
//! The harness hands every [`ResolvedRequest`] to a [`Transport`] and returns the
//! transport's response unmodified. [`ReqwestTransport`] is the default
//! implementation; tests can substitute their own.

pub mod config;
pub mod error;
pub mod native;

pub use config::ExecutionConfig;
pub use error::RequestError;
pub use native::ReqwestTransport;

use crate::models::request::ResolvedRequest;
use crate::models::response::HttpResponse;
use async_trait::async_trait;
use std::sync::Arc;

/// Sends a resolved request and returns the complete response.
///
/// Implementations own timeouts and connection handling. They must not retry:
/// a failure is reported once, to the step that sent the request.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ResolvedRequest) -> Result<HttpResponse, RequestError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: &ResolvedRequest) -> Result<HttpResponse, RequestError> {
        (**self).send(request).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn send(&self, request: &ResolvedRequest) -> Result<HttpResponse, RequestError> {
        (**self).send(request).await
    }
}
