// Tool Invocation - one subprocess execution, described up front

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::domain::mode::{ToolKind, ToolMode};

/// Interpreter used for the script form of the tools
pub const SCRIPT_INTERPRETER: &str = "python3";

/// Flag introducing a testbench template path
pub const TEMPLATE_FLAG: &str = "-T";

/// Host platform family (decides compiled binary vs. interpreted script)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Unix,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }
}

/// Program plus the arguments that precede the mode flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolExecutable {
    pub program: PathBuf,
    pub leading_args: Vec<OsString>,
}

impl ToolExecutable {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Bundled tool location: `<dir>/<name>.exe` on Windows,
    /// `python3 <dir>/<name>.py` elsewhere
    pub fn bundled(tool_dir: &Path, kind: ToolKind, platform: Platform) -> Self {
        let base = tool_dir.join(kind.base_name());
        match platform {
            Platform::Windows => Self::new(base.with_extension("exe")),
            Platform::Unix => Self::new(SCRIPT_INTERPRETER).with_args([base.with_extension("py")]),
        }
    }
}

/// Fully resolved command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl std::fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " \"{}\"", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Immutable description of exactly one tool execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub executable: ToolExecutable,
    pub mode: ToolMode,
    pub input_path: PathBuf,
    pub template_path: Option<PathBuf>,
}

impl ToolInvocation {
    /// Assemble the invocation; the template is dropped for modes that
    /// do not accept one
    pub fn new(
        executable: ToolExecutable,
        mode: ToolMode,
        input_path: impl Into<PathBuf>,
        template_path: Option<PathBuf>,
    ) -> Self {
        Self {
            executable,
            mode,
            input_path: input_path.into(),
            template_path: template_path.filter(|_| mode.accepts_template()),
        }
    }

    /// `[leading_args..] <flag> <input> [-T <template>]`
    pub fn to_command(&self) -> ToolCommand {
        let mut args = self.executable.leading_args.clone();
        args.push(self.mode.flag().into());
        args.push(self.input_path.clone().into_os_string());

        if let Some(template) = &self.template_path {
            args.push(TEMPLATE_FLAG.into());
            args.push(template.clone().into_os_string());
        }

        ToolCommand {
            program: self.executable.program.clone(),
            args,
        }
    }
}
