//! HTTP request data models.
//!
//! A [`RequestTemplate`] is what a test step writes: method, URL, headers and body,
//! any of which may contain `{{name}}` placeholders. The request builder turns it
//! into a [`ResolvedRequest`], an immutable snapshot with every placeholder
//! substituted, which is what the transport sends.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    /// HTTP GET method - retrieve a resource
    GET,
    /// HTTP POST method - submit data to create a resource
    POST,
    /// HTTP PUT method - replace a resource
    PUT,
    /// HTTP DELETE method - remove a resource
    DELETE,
    /// HTTP PATCH method - partially modify a resource
    PATCH,
    /// HTTP OPTIONS method - describe communication options
    OPTIONS,
    /// HTTP HEAD method - retrieve headers only
    HEAD,
}

impl HttpMethod {
    /// Returns the string representation of the HTTP method.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::DELETE => "DELETE",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::OPTIONS => "OPTIONS",
            HttpMethod::HEAD => "HEAD",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an unknown HTTP method name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMethod(pub String);

impl fmt::Display for UnknownMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown HTTP method: {}", self.0)
    }
}

impl std::error::Error for UnknownMethod {}

impl FromStr for HttpMethod {
    type Err = UnknownMethod;

    /// Parses a method name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "GET" => Ok(HttpMethod::GET),
            "POST" => Ok(HttpMethod::POST),
            "PUT" => Ok(HttpMethod::PUT),
            "DELETE" => Ok(HttpMethod::DELETE),
            "PATCH" => Ok(HttpMethod::PATCH),
            "OPTIONS" => Ok(HttpMethod::OPTIONS),
            "HEAD" => Ok(HttpMethod::HEAD),
            _ => Err(UnknownMethod(s.to_string())),
        }
    }
}

/// Body of a request template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BodyTemplate {
    /// Raw text, substituted as plain text and sent byte-for-byte.
    ///
    /// The caller is responsible for the substituted text being valid for
    /// whatever Content-Type is sent.
    Raw(String),

    /// Structured JSON. Only string leaves are substituted; the result is
    /// serialised once, so substituted values always end up correctly quoted.
    Json(JsonValue),
}

/// A request as written by a test step, before substitution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestTemplate {
    /// HTTP method.
    pub method: HttpMethod,

    /// URL template. Relative paths (starting with `/`) are resolved against
    /// the server base URL at build time.
    pub url: String,

    /// Header templates, in send order. Names are kept exactly as written.
    pub headers: Vec<(String, String)>,

    /// Optional body template.
    pub body: Option<BodyTemplate>,
}

impl RequestTemplate {
    /// Creates a template with no headers and no body.
    ///
    /// # Arguments
    ///
    /// * `method` - HTTP method
    /// * `url` - URL template, absolute or relative to the server base URL
    ///
    /// # Returns
    ///
    /// A new `RequestTemplate` ready for the builder-style helpers below.
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Creates a GET template for `url`.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::GET, url)
    }

    /// Creates a POST template for `url`.
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::POST, url)
    }

    /// Creates a PUT template for `url`.
    pub fn put(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::PUT, url)
    }

    /// Creates a PATCH template for `url`.
    pub fn patch(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::PATCH, url)
    }

    /// Creates a DELETE template for `url`.
    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::DELETE, url)
    }

    /// Appends a header template.
    ///
    /// # Arguments
    ///
    /// * `name` - Header name, sent exactly as written
    /// * `value` - Header value, which may contain placeholders
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Adds `Authorization: Bearer {{token_variable}}`.
    ///
    /// The token is read from the store when the request is built, so a token
    /// captured by an earlier step is picked up.
    pub fn bearer(self, token_variable: &str) -> Self {
        self.header("Authorization", format!("Bearer {{{{{}}}}}", token_variable))
    }

    /// Sets a raw text body.
    pub fn raw_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(BodyTemplate::Raw(body.into()));
        self
    }

    /// Sets a JSON body and a `Content-Type: application/json` header if none is set.
    pub fn json_body(mut self, body: JsonValue) -> Self {
        if !self
            .headers
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case("content-type"))
        {
            self.headers
                .push(("Content-Type".to_string(), "application/json".to_string()));
        }
        self.body = Some(BodyTemplate::Json(body));
        self
    }
}

/// A fully substituted request, ready for transport.
///
/// Built once by the request builder and never modified afterwards; later
/// writes to the environment store do not affect it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRequest {
    id: String,
    method: HttpMethod,
    url: String,
    headers: Vec<(String, String)>,
    body: Option<String>,
}

impl ResolvedRequest {
    /// Creates a resolved request with a fresh id.
    ///
    /// # Arguments
    ///
    /// * `method` - HTTP method
    /// * `url` - Fully substituted URL
    /// * `headers` - Substituted headers, in send order
    /// * `body` - Substituted body text, if any
    ///
    /// # Returns
    ///
    /// A new `ResolvedRequest` with a random v4 UUID as its id.
    pub fn new(
        method: HttpMethod,
        url: String,
        headers: Vec<(String, String)>,
        body: Option<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            method,
            url,
            headers,
            body,
        }
    }

    /// Unique identifier used to correlate log lines with responses.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// HTTP method.
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Substituted URL, absolute once a base URL was applied.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// All headers in send order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// First header value whose name matches `name`, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Substituted body text, exactly as it will be sent.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Checks if the request has a non-empty body.
    pub fn has_body(&self) -> bool {
        self.body.as_ref().is_some_and(|b| !b.is_empty())
    }

    /// Value of the `Content-Type` header, if set.
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }
}
