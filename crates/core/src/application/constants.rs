// Bridge constants (no magic values)
use std::time::Duration;

/// Default bound on a single tool invocation (30s)
pub const DEFAULT_TOOL_TIMEOUT_MS: u64 = 30_000;

/// Grace period between SIGTERM and SIGKILL when a tool must be stopped
pub const GRACEFUL_TERMINATION_TIMEOUT: Duration = Duration::from_millis(500);

/// Language tag of generated testbench documents
pub const TESTBENCH_LANGUAGE: &str = "verilog";

/// Environment variables passed through to the tool by default
pub const DEFAULT_ENV_ALLOWLIST: [&str; 8] = [
    "PATH",
    "HOME",
    "USER",
    "TMPDIR",
    "TEMP",
    "TMP",
    "SYSTEMROOT",
    "PYTHONPATH",
];

/// Preview panel identity
pub const PREVIEW_VIEW_TYPE: &str = "Documentation";
pub const PREVIEW_TITLE: &str = "Preview: documentation";

/// Directory (under the tool dir) holding the preview's script assets
pub const PREVIEW_ASSET_DIR: &str = "wavedrom";

/// User-facing messages
pub const MSG_INSTANTIATION_COPIED: &str =
    "hyhdl: the instantiation code is copied to the clipboard";
pub const MSG_TESTBENCH_GENERATED: &str = "hyhdl: The code of testbench has been generated";
pub const MSG_TEMPLATE_MISSING: &str =
    "user specified testbench template does not exist, using default template";
pub const MSG_SAVE_FIRST: &str = "hyhdl: currently edited file needs be saved firstly";
pub const MSG_EXPORTED_PREFIX: &str = "hyhdl: The README document has been exported to";
