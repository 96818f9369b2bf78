//! Environment and request-templating layer for end-to-end API test suites
//!
//! A suite drives a ticketing API through a sequence of HTTP steps. Each step
//! is written as a request template containing `{{name}}` placeholders that are
//! filled in from a shared environment store just before the request is sent.
//! Later steps depend on ids and tokens captured from earlier responses.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - **environment**: The shared variable store and environment file loading
//! - **variables**: Placeholder substitution and response captures
//! - **models**: Request templates, resolved requests and responses
//! - **builder**: Turns a template into a concrete request
//! - **executor**: Sends resolved requests over HTTP using reqwest
//! - **session**: Ties store, builder and transport together for a suite
//! - **fixtures**: Setup steps shared by suites (users, events)
//! - **config**: Harness settings and environment overrides
//!
//! # Usage
//!
//! ```no_run
//! use rest_harness::config::HarnessConfig;
//! use rest_harness::models::RequestTemplate;
//! use rest_harness::TestSession;
//!
//! # async fn run() -> Result<(), rest_harness::HarnessError> {
//! let config = HarnessConfig::default().with_env_overrides()?;
//! let session = TestSession::from_config(&config)?;
//!
//! let id = rest_harness::fixtures::create_event(&session, "last_event_id", "Sunday jam").await?;
//!
//! let fans = RequestTemplate::get("/events/{{last_event_id}}/fans").bearer("org_admin_token");
//! let response = session.send(&fans).await?;
//! assert!(response.is_success());
//! # let _ = id;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod environment;
pub mod error;
pub mod executor;
pub mod fixtures;
pub mod models;
pub mod session;
pub mod variables;

pub use builder::RequestBuilder;
pub use environment::{EnvironmentStore, MissingVariablePolicy};
pub use error::HarnessError;
pub use session::TestSession;
pub use variables::substitute_variables;
