// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Unknown tool mode: {0}")]
    UnknownMode(String),

    #[error("Invalid webview message: {0}")]
    InvalidMessage(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
