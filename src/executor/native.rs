//! HTTP transport backed by reqwest.

use super::config::ExecutionConfig;
use super::error::RequestError;
use super::Transport;
use crate::models::request::{HttpMethod, ResolvedRequest};
use crate::models::response::HttpResponse;
use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::redirect::Policy;
use std::collections::HashMap;
use std::time::Instant;
use url::Url;

/// Sends resolved requests with a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Builds a transport with the given execution settings.
    pub fn new(config: &ExecutionConfig) -> Result<Self, RequestError> {
        let redirect = if config.follow_redirects {
            Policy::limited(10)
        } else {
            Policy::none()
        };

        let client = reqwest::Client::builder()
            .timeout(config.timeout_duration())
            .redirect(redirect)
            .danger_accept_invalid_certs(!config.validate_ssl)
            .build()
            .map_err(|e| RequestError::BuildError(e.to_string()))?;

        Ok(Self { client })
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::GET => reqwest::Method::GET,
        HttpMethod::POST => reqwest::Method::POST,
        HttpMethod::PUT => reqwest::Method::PUT,
        HttpMethod::DELETE => reqwest::Method::DELETE,
        HttpMethod::PATCH => reqwest::Method::PATCH,
        HttpMethod::HEAD => reqwest::Method::HEAD,
        HttpMethod::OPTIONS => reqwest::Method::OPTIONS,
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &ResolvedRequest) -> Result<HttpResponse, RequestError> {
        let start_time = Instant::now();
        let url = Url::parse(request.url())?;

        let mut req_builder = self.client.request(to_reqwest_method(request.method()), url);

        for (name, value) in request.headers() {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| RequestError::ProtocolError(format!("header '{}': {}", name, e)))?;
            let header_value = HeaderValue::from_bytes(value.as_bytes())
                .map_err(|e| RequestError::ProtocolError(format!("header '{}': {}", name, e)))?;
            req_builder = req_builder.header(header_name, header_value);
        }

        if let Some(body) = request.body() {
            req_builder = req_builder.body(body.to_string());
        }

        let response = req_builder.send().await?;

        let status_code = response.status().as_u16();
        let status_text = response
            .status()
            .canonical_reason()
            .unwrap_or("Unknown")
            .to_string();

        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(value_str) = value.to_str() {
                headers.insert(name.as_str().to_string(), value_str.to_string());
            }
        }

        let body = response.bytes().await?.to_vec();

        let mut http_response = HttpResponse::new(status_code, status_text);
        http_response.headers = headers;
        http_response.set_body(body);
        http_response.duration = start_time.elapsed();

        Ok(http_response)
    }
}
