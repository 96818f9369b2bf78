//! Data models for HTTP requests and responses.
//!
//! This module contains the request templates written by test steps, the
//! resolved requests produced from them, and the responses returned by a transport.

pub mod request;
pub mod response;

pub use request::{BodyTemplate, HttpMethod, RequestTemplate, ResolvedRequest, UnknownMethod};
pub use response::HttpResponse;
