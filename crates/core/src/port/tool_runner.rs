// Tool Runner Port
// Abstraction for executing the external tool (subprocess in production)

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::application::cancel::CancelToken;
use crate::domain::ToolCommand;

/// Raw outcome of one process execution
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub status: ExecutionStatus,
    pub duration_ms: i64,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Execution status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionStatus {
    Success,
    Failed,
}

/// Execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("Process timeout after {0}ms")]
    Timeout(u64),

    #[error("Process cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    IoError(String),
}

/// Tool Runner trait
///
/// Implementations:
/// - SubprocessToolRunner: spawns the external process (infra-system)
/// - MockToolRunner: scripted outcomes for tests
#[async_trait]
pub trait ToolRunner: Send + Sync {
    /// Run a command to completion and capture its output
    ///
    /// # Errors
    /// - ExecutionError::SpawnFailed if the executable cannot be started
    /// - ExecutionError::Timeout if execution exceeds `timeout`
    /// - ExecutionError::Cancelled if `cancel` fires first
    async fn run(
        &self,
        command: &ToolCommand,
        timeout: Duration,
        cancel: CancelToken,
    ) -> Result<ToolOutput, ExecutionError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    /// Mock runner behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Exit 0 and print the given path followed by CRLF
        ReportPath(PathBuf),
        /// Exit 0 with raw stdout
        Stdout(String),
        /// Exit 0 with nothing printed (in-place tools)
        Silent,
        /// Exit with the given code and stderr
        Exit { code: i32, stderr: String },
        /// Fail to start
        SpawnFailed(String),
        /// Time out after N ms
        Timeout(u64),
    }

    /// Mock Tool Runner for testing
    pub struct MockToolRunner {
        behavior: Arc<Mutex<MockBehavior>>,
        commands: Arc<Mutex<Vec<ToolCommand>>>,
    }

    impl MockToolRunner {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior: Arc::new(Mutex::new(behavior)),
                commands: Arc::new(Mutex::new(Vec::new())),
            }
        }
        pub fn reporting(path: impl Into<PathBuf>) -> Self {
            Self::new(MockBehavior::ReportPath(path.into()))
        }
        pub fn failing(code: i32, stderr: impl Into<String>) -> Self {
            Self::new(MockBehavior::Exit {
                code,
                stderr: stderr.into(),
            })
        }
        pub fn set_behavior(&self, behavior: MockBehavior) {
            *self.behavior.lock().unwrap() = behavior;
        }
        pub fn call_count(&self) -> usize {
            self.commands.lock().unwrap().len()
        }
        pub fn commands(&self) -> Vec<ToolCommand> {
            self.commands.lock().unwrap().clone()
        }
    }

    fn output(exit_code: i32, stdout: String, stderr: String) -> ToolOutput {
        ToolOutput {
            status: if exit_code == 0 {
                ExecutionStatus::Success
            } else {
                ExecutionStatus::Failed
            },
            duration_ms: 10,
            exit_code: Some(exit_code),
            stdout,
            stderr,
        }
    }

    #[async_trait]
    impl ToolRunner for MockToolRunner {
        async fn run(
            &self,
            command: &ToolCommand,
            _timeout: Duration,
            _cancel: CancelToken,
        ) -> Result<ToolOutput, ExecutionError> {
            self.commands.lock().unwrap().push(command.clone());

            let behavior = self.behavior.lock().unwrap().clone();

            match behavior {
                MockBehavior::ReportPath(path) => Ok(output(
                    0,
                    format!("{}\r\n", path.display()),
                    String::new(),
                )),
                MockBehavior::Stdout(stdout) => Ok(output(0, stdout, String::new())),
                MockBehavior::Silent => Ok(output(0, String::new(), String::new())),
                MockBehavior::Exit { code, stderr } => Ok(output(code, String::new(), stderr)),
                MockBehavior::SpawnFailed(msg) => Err(ExecutionError::SpawnFailed(msg)),
                MockBehavior::Timeout(ms) => Err(ExecutionError::Timeout(ms)),
            }
        }
    }
}
