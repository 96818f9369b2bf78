//! Variable resolution error types.

use std::fmt;

/// Errors that can occur while resolving or capturing variables
#[derive(Debug, Clone, PartialEq)]
pub enum VarError {
    /// Variable is not set in the environment store, or a capture path
    /// matched nothing in the response
    UndefinedVariable(String),

    /// A capture path could not be parsed
    InvalidPath(String),

    /// The response could not be read for capture (not UTF-8, not JSON)
    InvalidResponse(String),
}

impl fmt::Display for VarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarError::UndefinedVariable(name) => write!(f, "Undefined variable: {}", name),
            VarError::InvalidPath(msg) => write!(f, "Invalid capture path: {}", msg),
            VarError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
        }
    }
}

impl std::error::Error for VarError {}
