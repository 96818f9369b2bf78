//! Request builder.
//!
//! Turns a [`RequestTemplate`] into a [`ResolvedRequest`] by running the URL, every
//! header value and the body through the substitution engine, each independently.
//! The builder performs no I/O and never parses raw bodies.

use crate::environment::{EnvironmentStore, MissingVariablePolicy};
use crate::models::request::{BodyTemplate, HttpMethod, RequestTemplate, ResolvedRequest};
use crate::variables::{find_placeholders, substitute_variables, VarError};
use serde_json::Value as JsonValue;

/// Store variable that holds the base server URL, as used by existing suites.
pub const SERVER_VARIABLE: &str = "server";

/// Builds resolved requests against one environment store.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    store: EnvironmentStore,
    base_url: Option<String>,
    default_headers: Vec<(String, String)>,
}

impl RequestBuilder {
    /// Creates a builder reading from `store`.
    pub fn new(store: EnvironmentStore) -> Self {
        Self {
            store,
            base_url: None,
            default_headers: Vec::new(),
        }
    }

    /// Sets the fallback base URL for relative request URLs.
    ///
    /// The `server` store variable, when set, takes precedence.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets headers added to every request that does not define them.
    pub fn with_default_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.default_headers = headers
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    /// The store this builder substitutes from.
    pub fn store(&self) -> &EnvironmentStore {
        &self.store
    }

    /// Resolves `template` against the current contents of the store.
    ///
    /// Fails only when the store's missing-variable policy is `Fail` and a
    /// placeholder names an unset variable.
    pub fn build(&self, template: &RequestTemplate) -> Result<ResolvedRequest, VarError> {
        if self.store.policy() == MissingVariablePolicy::Fail {
            let missing = self.missing_variables(template);
            if let Some(first) = missing.first() {
                log::warn!("builder: unset variables: {}", missing.join(", "));
                return Err(VarError::UndefinedVariable(first.clone()));
            }
        }

        let url = self.resolve_url(&template.url)?;

        let mut headers = Vec::with_capacity(template.headers.len() + self.default_headers.len());
        for (name, value) in &template.headers {
            headers.push((name.clone(), substitute_variables(value, &self.store)?));
        }
        for (name, value) in &self.default_headers {
            if !headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(name)) {
                headers.push((name.clone(), substitute_variables(value, &self.store)?));
            }
        }

        let body = match &template.body {
            None => None,
            Some(BodyTemplate::Raw(raw)) => Some(substitute_variables(raw, &self.store)?),
            Some(BodyTemplate::Json(json)) => {
                let resolved = substitute_json(json, &self.store)?;
                Some(resolved.to_string())
            }
        };

        let request = ResolvedRequest::new(template.method, url, headers, body);
        log::debug!(
            "builder: resolved request {} {} {}",
            request.id(),
            request.method(),
            request.url()
        );
        Ok(request)
    }

    /// Lists the variables `template` refers to that are not set in the store.
    ///
    /// Covers the URL, header values, default header values the template does
    /// not override, and the body. Names appear once, in order of first use.
    pub fn missing_variables(&self, template: &RequestTemplate) -> Vec<String> {
        let mut texts: Vec<&str> = vec![template.url.as_str()];
        texts.extend(template.headers.iter().map(|(_, v)| v.as_str()));
        texts.extend(
            self.default_headers
                .iter()
                .filter(|(name, _)| {
                    !template
                        .headers
                        .iter()
                        .any(|(k, _)| k.eq_ignore_ascii_case(name))
                })
                .map(|(_, v)| v.as_str()),
        );

        let mut body_strings = Vec::new();
        match &template.body {
            Some(BodyTemplate::Raw(raw)) => texts.push(raw.as_str()),
            Some(BodyTemplate::Json(json)) => collect_strings(json, &mut body_strings),
            None => {}
        }
        texts.extend(body_strings);

        let mut missing: Vec<String> = Vec::new();
        for name in texts.into_iter().flat_map(find_placeholders) {
            if !self.store.contains(&name) && !missing.contains(&name) {
                missing.push(name);
            }
        }
        missing
    }

    /// Resolves a request from loose parts.
    ///
    /// `body` is treated as raw text.
    pub fn build_parts(
        &self,
        method: HttpMethod,
        url: &str,
        headers: &[(&str, &str)],
        body: Option<&str>,
    ) -> Result<ResolvedRequest, VarError> {
        let mut template = RequestTemplate::new(method, url);
        for (name, value) in headers {
            template = template.header(*name, *value);
        }
        if let Some(body) = body {
            template = template.raw_body(body);
        }
        self.build(&template)
    }

    fn resolve_url(&self, url_template: &str) -> Result<String, VarError> {
        let url = substitute_variables(url_template, &self.store)?;
        if !url.starts_with('/') {
            return Ok(url);
        }

        let base = self
            .store
            .get(SERVER_VARIABLE)
            .or_else(|| self.base_url.clone());

        Ok(match base {
            Some(base) => format!("{}{}", base.trim_end_matches('/'), url),
            None => url,
        })
    }
}

fn collect_strings<'a>(value: &'a JsonValue, out: &mut Vec<&'a str>) {
    match value {
        JsonValue::String(s) => out.push(s),
        JsonValue::Array(items) => items.iter().for_each(|item| collect_strings(item, out)),
        JsonValue::Object(map) => map.values().for_each(|item| collect_strings(item, out)),
        _ => {}
    }
}

/// Substitutes placeholders inside every string leaf of `value`.
///
/// Object keys, numbers, booleans and nulls are left untouched.
pub fn substitute_json(value: &JsonValue, store: &EnvironmentStore) -> Result<JsonValue, VarError> {
    Ok(match value {
        JsonValue::String(s) => JsonValue::String(substitute_variables(s, store)?),
        JsonValue::Array(items) => JsonValue::Array(
            items
                .iter()
                .map(|item| substitute_json(item, store))
                .collect::<Result<_, _>>()?,
        ),
        JsonValue::Object(map) => {
            let mut resolved = serde_json::Map::with_capacity(map.len());
            for (key, item) in map {
                resolved.insert(key.clone(), substitute_json(item, store)?);
            }
            JsonValue::Object(resolved)
        }
        other => other.clone(),
    })
}
