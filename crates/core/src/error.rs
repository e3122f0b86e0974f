// Central Error Type for the bridge

use std::path::PathBuf;
use thiserror::Error;

/// Bridge-level error type
///
/// Every failure of a command flows through this enum so callers (and tests)
/// can decide how to present it. The command layer maps variants to the
/// user-visible policy (silent, log only, warning).
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("No active document")]
    NoActiveDocument,

    #[error("External tool failed (exit code {exit_code:?}): {stderr}")]
    ToolExecutionFailed {
        stderr: String,
        exit_code: Option<i32>,
    },

    #[error("Configured path does not exist: {}", .0.display())]
    ConfigPathInvalid(PathBuf),

    #[error("Document must be saved first: {0}")]
    DocumentNotSaved(String),

    #[error("External tool timed out after {0}ms")]
    Timeout(u64),

    #[error("External tool invocation cancelled")]
    Cancelled,

    #[error("Invalid tool output: {0}")]
    InvalidToolOutput(String),

    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using BridgeError
pub type Result<T> = std::result::Result<T, BridgeError>;

impl From<crate::port::ExecutionError> for BridgeError {
    fn from(err: crate::port::ExecutionError) -> Self {
        use crate::port::ExecutionError;

        match err {
            // A missing executable is a tool failure like any other
            ExecutionError::SpawnFailed(msg) => BridgeError::ToolExecutionFailed {
                stderr: msg,
                exit_code: None,
            },
            ExecutionError::Timeout(ms) => BridgeError::Timeout(ms),
            ExecutionError::Cancelled => BridgeError::Cancelled,
            ExecutionError::IoError(msg) => BridgeError::Internal(msg),
        }
    }
}

impl BridgeError {
    /// True for failures the user is expected to act on (shown as warnings)
    pub fn is_user_actionable(&self) -> bool {
        matches!(
            self,
            BridgeError::DocumentNotSaved(_) | BridgeError::ConfigPathInvalid(_)
        )
    }
}
