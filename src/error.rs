//! Error type for test sessions and fixture helpers.

use crate::config::ConfigError;
use crate::environment::EnvError;
use crate::executor::RequestError;
use crate::variables::VarError;
use std::fmt;

/// Errors reported to a test step by a [`TestSession`](crate::session::TestSession)
/// or a fixture helper.
#[derive(Debug)]
pub enum HarnessError {
    /// Configuration was invalid.
    Config(ConfigError),

    /// The environment file could not be loaded.
    Environment(EnvError),

    /// Substitution or capture failed.
    Variable(VarError),

    /// The transport failed to deliver the request or read the response.
    Request(RequestError),

    /// The server answered with a status the step did not accept.
    UnexpectedStatus { status: u16, body: String },
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarnessError::Config(err) => write!(f, "{}", err),
            HarnessError::Environment(err) => write!(f, "{}", err),
            HarnessError::Variable(err) => write!(f, "{}", err),
            HarnessError::Request(err) => write!(f, "{}", err),
            HarnessError::UnexpectedStatus { status, body } => {
                write!(f, "Unexpected response status {}: {}", status, body)
            }
        }
    }
}

impl std::error::Error for HarnessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HarnessError::Config(err) => Some(err),
            HarnessError::Environment(err) => Some(err),
            HarnessError::Variable(err) => Some(err),
            HarnessError::Request(err) => Some(err),
            HarnessError::UnexpectedStatus { .. } => None,
        }
    }
}

impl From<ConfigError> for HarnessError {
    fn from(err: ConfigError) -> Self {
        HarnessError::Config(err)
    }
}

impl From<EnvError> for HarnessError {
    fn from(err: EnvError) -> Self {
        HarnessError::Environment(err)
    }
}

impl From<VarError> for HarnessError {
    fn from(err: VarError) -> Self {
        HarnessError::Variable(err)
    }
}

impl From<RequestError> for HarnessError {
    fn from(err: RequestError) -> Self {
        HarnessError::Request(err)
    }
}
