// Bridge settings (deserialized by the composition root)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::application::constants::{DEFAULT_ENV_ALLOWLIST, DEFAULT_TOOL_TIMEOUT_MS};
use crate::domain::{Platform, SnapshotStrategy, ToolExecutable, ToolKind};
use crate::error::{BridgeError, Result};

/// Explicit program for one tool, replacing the bundled one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOverride {
    pub program: PathBuf,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeSettings {
    /// Directory holding the bundled tools (`hyhdl`, `verilogFormatter`)
    pub tool_dir: PathBuf,
    pub tool: Option<ToolOverride>,
    pub formatter: Option<ToolOverride>,

    /// Testbench template; empty selects the tool's default template
    pub testbench_template_file_path: String,
    pub enable_formatter: bool,

    pub tool_timeout_ms: u64,
    pub snapshot_strategy: SnapshotStrategy,
    pub scratch_dir: PathBuf,
    pub env_allowlist: Vec<String>,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            tool_dir: PathBuf::from("pyTools"),
            tool: None,
            formatter: None,
            testbench_template_file_path: String::new(),
            enable_formatter: true,
            tool_timeout_ms: DEFAULT_TOOL_TIMEOUT_MS,
            snapshot_strategy: SnapshotStrategy::Unique,
            scratch_dir: std::env::temp_dir(),
            env_allowlist: DEFAULT_ENV_ALLOWLIST.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl BridgeSettings {
    /// Executable serving `kind`: the override if configured, else the bundled tool
    pub fn executable_for(&self, kind: ToolKind, platform: Platform) -> ToolExecutable {
        let override_ = match kind {
            ToolKind::Hyhdl => self.tool.as_ref(),
            ToolKind::Formatter => self.formatter.as_ref(),
        };

        match override_ {
            Some(o) => ToolExecutable::new(&o.program).with_args(o.args.iter()),
            None => ToolExecutable::bundled(&self.tool_dir, kind, platform),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.tool_timeout_ms)
    }

    /// Configured template path, `None` when left empty
    pub fn configured_template(&self) -> Option<PathBuf> {
        let trimmed = self.testbench_template_file_path.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(PathBuf::from(trimmed))
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.tool_timeout_ms == 0 {
            return Err(BridgeError::Config(
                "tool_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self
            .tool
            .iter()
            .chain(self.formatter.iter())
            .any(|o| o.program.as_os_str().is_empty())
        {
            return Err(BridgeError::Config(
                "tool override has an empty program".to_string(),
            ));
        }
        Ok(())
    }
}
