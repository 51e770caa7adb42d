//! CPI client error types

use crate::envelope::Method;
use serde_json::Value;
use thiserror::Error;

/// Failure of the command runner itself.
///
/// The CPI program could not be started, or its output could not be parsed
/// into a response envelope. No [`CmdOutput`](crate::CmdOutput) exists for
/// these failures.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("{0}")]
    CommandFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TransportError {
    pub fn command_failed(message: impl Into<String>) -> Self {
        Self::CommandFailed(message.into())
    }
}

/// Error reported by the CPI program in its response envelope.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("CPI '{method}' method responded with error: {error_type}: {message}")]
pub struct CpiError {
    method: Method,
    error_type: String,
    message: String,
    ok_to_retry: bool,
}

impl CpiError {
    pub fn new(
        method: Method,
        error_type: impl Into<String>,
        message: impl Into<String>,
        ok_to_retry: bool,
    ) -> Self {
        Self {
            method,
            error_type: error_type.into(),
            message: message.into(),
            ok_to_retry,
        }
    }

    /// The CPI method whose invocation failed
    pub fn method(&self) -> Method {
        self.method
    }

    /// Backend-defined classification, e.g. `Bosh::Clouds::VMNotFound`
    pub fn error_type(&self) -> &str {
        &self.error_type
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn ok_to_retry(&self) -> bool {
        self.ok_to_retry
    }
}

/// CPI client errors
#[derive(Error, Debug)]
pub enum CloudError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Cpi(#[from] CpiError),

    #[error("unexpected external command result: '{0}'")]
    UnexpectedResult(Value),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CloudError {
    /// The structured CPI error, if the CPI program reported one
    pub fn as_cpi_error(&self) -> Option<&CpiError> {
        match self {
            CloudError::Cpi(e) => Some(e),
            _ => None,
        }
    }

    /// Whether the CPI marked this failure as safe to retry.
    ///
    /// Transport and decode failures are never retryable at this layer.
    pub fn is_retryable(&self) -> bool {
        self.as_cpi_error().is_some_and(CpiError::ok_to_retry)
    }
}

pub type Result<T> = std::result::Result<T, CloudError>;
