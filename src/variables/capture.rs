//! Capture rules that copy response fields into the environment store.
//!
//! A fixture that creates a resource usually needs to remember something about
//! it: the new event id, the access token returned by a login. A [`Capture`]
//! names the variable to write and where to read the value from.
//!
//! # Syntax
//!
//! ```text
//! last_event_id = $.id
//! first_fan = $.data[0].user_id
//! request_id = headers.X-Request-Id
//! ```

use super::VarError;
use crate::environment::EnvironmentStore;
use crate::models::response::HttpResponse;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value as JsonValue;

/// Matches `name = path`, with optional whitespace around components
static CAPTURE_RULE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([a-zA-Z_][a-zA-Z0-9_]*)\s*=\s*(.+?)\s*$")
        .expect("Failed to compile capture rule regex")
});

/// Where a captured value is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureSource {
    /// A field of the JSON response body, addressed by a JSONPath subset.
    Json(JsonPath),

    /// A response header, matched case-insensitively.
    Header(String),
}

/// A single capture rule: write the value found at `source` into `variable`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    /// Name of the environment variable to write.
    pub variable: String,

    /// Location of the value in the response.
    pub source: CaptureSource,
}

impl Capture {
    /// Captures a JSON body field, e.g. `Capture::json("last_event_id", "$.id")`.
    pub fn json(variable: impl Into<String>, path: &str) -> Result<Self, VarError> {
        Ok(Self {
            variable: variable.into(),
            source: CaptureSource::Json(JsonPath::parse(path)?),
        })
    }

    /// Captures a response header.
    pub fn header(variable: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            source: CaptureSource::Header(name.into()),
        }
    }

    /// Parses a `name = path` rule.
    ///
    /// Paths starting with `headers.` read a header; anything else is a JSONPath.
    ///
    /// # Examples
    ///
    /// ```
    /// use rest_harness::variables::capture::{Capture, CaptureSource};
    ///
    /// let rule = Capture::parse("org_admin_token = $.access_token").unwrap();
    /// assert_eq!(rule.variable, "org_admin_token");
    ///
    /// let rule = Capture::parse("request_id = headers.X-Request-Id").unwrap();
    /// assert_eq!(rule.source, CaptureSource::Header("X-Request-Id".to_string()));
    /// ```
    pub fn parse(rule: &str) -> Result<Self, VarError> {
        let captures = CAPTURE_RULE_REGEX
            .captures(rule)
            .ok_or_else(|| VarError::InvalidPath(format!("Malformed capture rule: {}", rule)))?;

        let variable = captures.get(1).map_or("", |m| m.as_str());
        let path = captures.get(2).map_or("", |m| m.as_str());

        match path.strip_prefix("headers.") {
            Some(header) if !header.trim().is_empty() => Ok(Self::header(variable, header.trim())),
            Some(_) => Err(VarError::InvalidPath(format!("Missing header name: {}", rule))),
            None => Self::json(variable, path),
        }
    }

    /// Reads this rule's value from `response`.
    pub fn extract(&self, response: &HttpResponse) -> Result<JsonValue, VarError> {
        match &self.source {
            CaptureSource::Header(name) => response
                .header(name)
                .map(|v| JsonValue::String(v.to_string()))
                .ok_or_else(|| {
                    VarError::UndefinedVariable(format!("Header '{}' not found in response", name))
                }),
            CaptureSource::Json(path) => {
                let json = response.json().map_err(|e| {
                    VarError::InvalidResponse(format!("Failed to parse JSON response: {}", e))
                })?;
                path.evaluate(&json).cloned()
            }
        }
    }
}

/// Evaluates every rule against `response` and writes the results into `store`.
///
/// Rules are applied in order; the first failing rule stops the run and the
/// variables of the remaining rules are left untouched.
pub fn apply_captures(
    response: &HttpResponse,
    captures: &[Capture],
    store: &EnvironmentStore,
) -> Result<(), VarError> {
    for capture in captures {
        let value = capture.extract(response)?;
        store.set_json(capture.variable.clone(), &value);
    }
    Ok(())
}

/// Represents a segment in a JSONPath expression.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PathSegment {
    /// Object field access (e.g., "user", "name")
    Field(String),

    /// Array index access (e.g., [0], [5])
    ArrayIndex(usize),
}

/// A parsed JSONPath supporting `$`, dotted fields and numeric indexes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPath {
    raw: String,
    segments: Vec<PathSegment>,
}

impl JsonPath {
    /// Parses `$.data[0].id`-style paths. The leading `$` is optional.
    pub fn parse(path: &str) -> Result<Self, VarError> {
        let raw = path.trim();
        let body = raw.strip_prefix('$').unwrap_or(raw);
        let body = body.strip_prefix('.').unwrap_or(body);

        let invalid = || VarError::InvalidPath(raw.to_string());
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut after_index = false;
        let mut chars = body.chars();

        while let Some(ch) = chars.next() {
            match ch {
                '.' => {
                    if !current.is_empty() {
                        segments.push(PathSegment::Field(std::mem::take(&mut current)));
                    } else if !after_index {
                        return Err(invalid());
                    }
                    after_index = false;
                }
                '[' => {
                    if !current.is_empty() {
                        segments.push(PathSegment::Field(std::mem::take(&mut current)));
                    }

                    let mut index_str = String::new();
                    let mut closed = false;
                    for c in chars.by_ref() {
                        if c == ']' {
                            closed = true;
                            break;
                        }
                        index_str.push(c);
                    }
                    if !closed {
                        return Err(invalid());
                    }

                    let index = index_str.trim().parse::<usize>().map_err(|_| invalid())?;
                    segments.push(PathSegment::ArrayIndex(index));
                    after_index = true;
                    continue;
                }
                ']' => return Err(invalid()),
                _ => {
                    if after_index {
                        return Err(invalid());
                    }
                    current.push(ch);
                }
            }
        }

        if !current.is_empty() {
            segments.push(PathSegment::Field(current));
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// Returns the path as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Navigates `json` along this path.
    pub fn evaluate<'a>(&self, json: &'a JsonValue) -> Result<&'a JsonValue, VarError> {
        let mut current = json;

        for segment in &self.segments {
            current = match segment {
                PathSegment::Field(name) => current.get(name).ok_or_else(|| {
                    VarError::UndefinedVariable(format!(
                        "Field '{}' not found in JSON ({})",
                        name, self.raw
                    ))
                })?,
                PathSegment::ArrayIndex(index) => current.get(index).ok_or_else(|| {
                    VarError::UndefinedVariable(format!(
                        "Array index {} out of bounds ({})",
                        index, self.raw
                    ))
                })?,
            };
        }

        Ok(current)
    }
}
