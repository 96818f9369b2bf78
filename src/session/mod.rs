//! Test session: one environment store, one request builder, one transport.
//!
//! Every step of a suite goes through the same session so that values written
//! by earlier steps (tokens, ids) are visible to later ones. Steps are expected
//! to run one after another; a session shared across parallel workers keeps
//! each read and write atomic but does not order them.

use crate::builder::RequestBuilder;
use crate::config::HarnessConfig;
use crate::environment::{discover_environment, load_environment_file, EnvironmentStore};
use crate::error::HarnessError;
use crate::executor::{ExecutionConfig, ReqwestTransport, Transport};
use crate::models::request::{RequestTemplate, ResolvedRequest};
use crate::models::response::HttpResponse;
use crate::variables::{apply_captures, Capture};
use std::path::Path;

/// Runs requests for a test suite against a shared environment store.
pub struct TestSession<T = ReqwestTransport> {
    builder: RequestBuilder,
    transport: T,
}

impl TestSession<ReqwestTransport> {
    /// Builds a session from configuration.
    ///
    /// The store is seeded from `environment_file` when configured, otherwise
    /// from an environment file discovered from the working directory.
    pub fn from_config(config: &HarnessConfig) -> Result<Self, HarnessError> {
        config.validate()?;

        let store = EnvironmentStore::with_policy(config.missing_variables);
        match &config.environment_file {
            Some(path) => {
                load_environment_file(Path::new(path), &store)?;
            }
            None => {
                if let Ok(cwd) = std::env::current_dir() {
                    discover_environment(&cwd, &store)?;
                }
            }
        }

        let transport = ReqwestTransport::new(&ExecutionConfig::from(config))?;
        Ok(Self::with_store(store, config, transport))
    }
}

impl<T: Transport> TestSession<T> {
    /// Creates a session from an existing builder and transport.
    pub fn new(builder: RequestBuilder, transport: T) -> Self {
        Self { builder, transport }
    }

    /// Creates a session over `store` using the base URL and default headers
    /// from `config`.
    pub fn with_store(store: EnvironmentStore, config: &HarnessConfig, transport: T) -> Self {
        let builder = RequestBuilder::new(store)
            .with_base_url(config.server.clone())
            .with_default_headers(config.default_headers.clone());
        Self::new(builder, transport)
    }

    /// The store shared by every step of this session.
    pub fn store(&self) -> &EnvironmentStore {
        self.builder.store()
    }

    /// The builder used to resolve every template.
    pub fn builder(&self) -> &RequestBuilder {
        &self.builder
    }

    /// The transport requests are sent through.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Resolves `template` without sending it.
    pub fn resolve(&self, template: &RequestTemplate) -> Result<ResolvedRequest, HarnessError> {
        Ok(self.builder.build(template)?)
    }

    /// Resolves and sends `template`, returning the response whatever its status.
    pub async fn send(&self, template: &RequestTemplate) -> Result<HttpResponse, HarnessError> {
        let request = self.resolve(template)?;
        self.send_resolved(&request).await
    }

    /// Sends an already resolved request.
    pub async fn send_resolved(
        &self,
        request: &ResolvedRequest,
    ) -> Result<HttpResponse, HarnessError> {
        let response = self.transport.send(request).await.map_err(|e| {
            log::warn!(
                "session: {} {} {} failed: {}",
                request.id(),
                request.method(),
                request.url(),
                e
            );
            e
        })?;

        log::info!(
            "session: {} {} -> {} ({} ms)",
            request.method(),
            request.url(),
            response.status_code,
            response.duration.as_millis()
        );
        Ok(response)
    }

    /// Sends `template`, requires a 2xx response, and applies `captures` to it.
    ///
    /// # Arguments
    ///
    /// * `template` - The request to resolve and send
    /// * `captures` - Rules copying response fields into the store
    ///
    /// # Errors
    ///
    /// * `HarnessError::Variable` if substitution or a capture rule fails
    /// * `HarnessError::Request` if the transport fails
    /// * `HarnessError::UnexpectedStatus` for any non-2xx status
    ///
    /// Captures are applied in order and stop at the first failing rule; no
    /// capture runs unless the status is 2xx.
    pub async fn send_and_capture(
        &self,
        template: &RequestTemplate,
        captures: &[Capture],
    ) -> Result<HttpResponse, HarnessError> {
        let response = self.send(template).await?;
        expect_success(&response)?;
        apply_captures(&response, captures, self.store())?;
        Ok(response)
    }
}

/// Returns `UnexpectedStatus` unless `response` has a 2xx status.
pub fn expect_success(response: &HttpResponse) -> Result<(), HarnessError> {
    if response.is_success() {
        Ok(())
    } else {
        Err(HarnessError::UnexpectedStatus {
            status: response.status_code,
            body: String::from_utf8_lossy(&response.body).into_owned(),
        })
    }
}
