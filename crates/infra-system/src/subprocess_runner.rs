// Subprocess tool runner
// reason: tokio::process for non-blocking execution, nix for graceful SIGTERM
use async_trait::async_trait;
use std::collections::HashMap;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use hyhdl_core::application::cancel::CancelToken;
use hyhdl_core::application::constants::GRACEFUL_TERMINATION_TIMEOUT;
use hyhdl_core::domain::ToolCommand;
use hyhdl_core::port::tool_runner::{ExecutionError, ExecutionStatus, ToolOutput, ToolRunner};
use hyhdl_core::port::TimeProvider;

/// How the wait for the child ended
enum Waited {
    Finished {
        status: std::io::Result<ExitStatus>,
        stdout: std::io::Result<Vec<u8>>,
        stderr: std::io::Result<Vec<u8>>,
    },
    TimedOut,
    Cancelled,
}

/// Runs the external tool as a child process
///
/// The child gets a cleared environment rebuilt from an allowlist of the
/// parent's variables, no stdin, and piped stdout/stderr. On Unix it leads
/// its own process group so helpers it leaves behind are stopped with it.
pub struct SubprocessToolRunner {
    time_provider: Arc<dyn TimeProvider>,
    env_allowlist: Vec<String>,
}

impl SubprocessToolRunner {
    /// Create a new subprocess runner
    ///
    /// # Arguments
    /// * `time_provider` - Time provider for duration tracking
    /// * `env_allowlist` - Parent environment variables passed to the tool
    ///
    /// # Example
    /// ```ignore
    /// let runner = SubprocessToolRunner::new(
    ///     Arc::new(SystemTimeProvider),
    ///     vec!["PATH".to_string(), "HOME".to_string()],
    /// );
    /// ```
    pub fn new(time_provider: Arc<dyn TimeProvider>, env_allowlist: Vec<String>) -> Self {
        Self {
            time_provider,
            env_allowlist,
        }
    }

    /// Keep allowlisted variables only (names compared case-insensitively)
    fn filter_env<I>(&self, env: I) -> HashMap<String, String>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        env.into_iter()
            .filter(|(k, _)| self.env_allowlist.iter().any(|a| a.eq_ignore_ascii_case(k)))
            .collect()
    }

    fn build(&self, command: &ToolCommand) -> Command {
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .env_clear()
            .envs(self.filter_env(std::env::vars()))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        #[cfg(unix)]
        {
            cmd.process_group(0);
        }

        cmd
    }

    /// SIGTERM to the process group, SIGKILL once the grace period is over
    ///
    /// `pgid` is the child's pid captured at spawn: the group outlives the
    /// child when a helper keeps running after the tool itself exited.
    async fn terminate(&self, child: &mut Child, pgid: Option<u32>) {
        #[cfg(unix)]
        {
            if let Some(pgid) = pgid {
                use nix::sys::signal::{killpg, Signal};
                use nix::unistd::Pid;

                let group = Pid::from_raw(pgid as i32);
                info!(pgid = %pgid, "Sending SIGTERM to tool process group");
                if let Err(e) = killpg(group, Signal::SIGTERM) {
                    debug!(pgid = %pgid, error = %e, "SIGTERM not delivered");
                }

                if tokio::time::timeout(GRACEFUL_TERMINATION_TIMEOUT, child.wait())
                    .await
                    .is_err()
                {
                    warn!(pgid = %pgid, "Tool did not exit after SIGTERM, killing");
                }

                // stragglers that ignored SIGTERM
                if let Err(e) = killpg(group, Signal::SIGKILL) {
                    debug!(pgid = %pgid, error = %e, "Process group already gone");
                }
            }
        }

        #[cfg(not(unix))]
        let _ = pgid;

        if let Ok(None) = child.try_wait() {
            if let Err(e) = child.kill().await {
                warn!(error = %e, "Failed to kill tool process");
            }
        }
    }
}

async fn read_pipe<R>(pipe: Option<R>) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

fn decode(bytes: std::io::Result<Vec<u8>>) -> Result<String, ExecutionError> {
    let bytes = bytes.map_err(|e| ExecutionError::IoError(e.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[async_trait]
impl ToolRunner for SubprocessToolRunner {
    async fn run(
        &self,
        command: &ToolCommand,
        timeout: Duration,
        mut cancel: CancelToken,
    ) -> Result<ToolOutput, ExecutionError> {
        let timeout_ms = timeout.as_millis() as u64;
        let start_time = self.time_provider.now_millis();

        info!(command = %command, timeout_ms = %timeout_ms, "Starting tool execution");

        let mut child = self.build(command).spawn().map_err(|e| {
            ExecutionError::SpawnFailed(format!("{}: {}", command.program.display(), e))
        })?;
        let pgid = child.id();
        let stdout_pipe = child.stdout.take();
        let stderr_pipe = child.stderr.take();

        // The deadline covers the pipes too: a helper left running by the
        // tool keeps them open after the tool itself has exited.
        let waited = {
            let finished = async {
                let (status, stdout, stderr) =
                    tokio::join!(child.wait(), read_pipe(stdout_pipe), read_pipe(stderr_pipe));
                Waited::Finished {
                    status,
                    stdout,
                    stderr,
                }
            };

            tokio::select! {
                finished = finished => finished,
                _ = tokio::time::sleep(timeout) => Waited::TimedOut,
                _ = cancel.cancelled() => Waited::Cancelled,
            }
        };

        let (status, stdout, stderr) = match waited {
            Waited::Finished {
                status,
                stdout,
                stderr,
            } => (
                status.map_err(|e| ExecutionError::IoError(e.to_string()))?,
                decode(stdout)?,
                decode(stderr)?,
            ),
            Waited::TimedOut => {
                warn!(command = %command, timeout_ms = %timeout_ms, "Tool execution timed out");
                self.terminate(&mut child, pgid).await;
                return Err(ExecutionError::Timeout(timeout_ms));
            }
            Waited::Cancelled => {
                info!(command = %command, "Tool execution cancelled");
                self.terminate(&mut child, pgid).await;
                return Err(ExecutionError::Cancelled);
            }
        };

        let duration_ms = self.time_provider.now_millis() - start_time;

        let output = ToolOutput {
            status: if status.success() {
                ExecutionStatus::Success
            } else {
                ExecutionStatus::Failed
            },
            duration_ms,
            exit_code: status.code(),
            stdout,
            stderr,
        };

        info!(
            command = %command,
            duration_ms = %duration_ms,
            exit_code = ?output.exit_code,
            status = ?output.status,
            "Tool execution completed"
        );

        Ok(output)
    }
}
