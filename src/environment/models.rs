//! Environment data models for REST Harness
//!
//! This module defines the values held by the environment store and the policy
//! that decides what happens when a template references a variable nobody set.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single value bound to a variable name in the environment store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Binding {
    /// A plain string value (may be empty)
    Value(String),

    /// An explicit null, usually captured from a JSON response field
    Null,
}

impl Binding {
    /// Returns the string value, or None for a null binding
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Binding::Value(value) => Some(value.as_str()),
            Binding::Null => None,
        }
    }

    /// Text inserted into a template in place of this binding
    pub fn substitution_text(&self) -> &str {
        match self {
            Binding::Value(value) => value.as_str(),
            Binding::Null => "null",
        }
    }

    /// Checks if this binding is an explicit null
    pub fn is_null(&self) -> bool {
        matches!(self, Binding::Null)
    }
}

impl From<String> for Binding {
    fn from(value: String) -> Self {
        Binding::Value(value)
    }
}

impl From<&str> for Binding {
    fn from(value: &str) -> Self {
        Binding::Value(value.to_string())
    }
}

impl From<Option<String>> for Binding {
    fn from(value: Option<String>) -> Self {
        value.map_or(Binding::Null, Binding::Value)
    }
}

/// What the substitution engine does with a placeholder whose variable is unset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MissingVariablePolicy {
    /// Keep the literal `{{name}}` text in the output
    #[default]
    LeaveAsIs,

    /// Stop with an `UndefinedVariable` error before the request is built
    Fail,

    /// Replace the placeholder with an empty string
    Empty,
}

impl MissingVariablePolicy {
    /// Returns the configuration spelling of the policy
    pub fn as_str(&self) -> &'static str {
        match self {
            MissingVariablePolicy::LeaveAsIs => "leaveAsIs",
            MissingVariablePolicy::Fail => "fail",
            MissingVariablePolicy::Empty => "empty",
        }
    }
}

impl fmt::Display for MissingVariablePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
