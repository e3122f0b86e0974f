//! Settings loading: defaults -> settings file -> HYHDL_* environment

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use hyhdl_core::application::BridgeSettings;

/// Settings file looked up in the working directory when none is given
const DEFAULT_CONFIG_NAME: &str = "hyhdl";

/// Environment prefix (`HYHDL_TOOL_TIMEOUT_MS=5000`, ...)
const ENV_PREFIX: &str = "HYHDL";

/// Bundled tools directory, relative to the executable
const BUNDLED_TOOL_DIR: &str = "pyTools";

/// Load bridge settings
///
/// An explicit `config_path` must exist; the default `hyhdl.{toml,json,yaml}`
/// is optional.
pub fn load_settings(config_path: Option<&Path>) -> Result<BridgeSettings> {
    let file = match config_path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
    };

    let mut settings: BridgeSettings = config::Config::builder()
        .add_source(file)
        .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
        .build()
        .context("Failed to read settings")?
        .try_deserialize()
        .context("Invalid settings")?;

    expand_paths(&mut settings);

    if settings.tool_dir == BridgeSettings::default().tool_dir {
        if let Some(dir) = bundled_tool_dir() {
            settings.tool_dir = dir;
        }
    }

    settings.validate()?;

    tracing::debug!(settings = ?settings, "Settings loaded");
    Ok(settings)
}

fn expand(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}

/// Expand `~` in every user-supplied path
fn expand_paths(settings: &mut BridgeSettings) {
    settings.tool_dir = expand(&settings.tool_dir);
    settings.scratch_dir = expand(&settings.scratch_dir);
    if !settings.testbench_template_file_path.is_empty() {
        settings.testbench_template_file_path =
            shellexpand::tilde(&settings.testbench_template_file_path).into_owned();
    }
    for tool in settings.tool.iter_mut().chain(settings.formatter.iter_mut()) {
        tool.program = expand(&tool.program);
    }
}

fn bundled_tool_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let dir = exe.parent()?.join(BUNDLED_TOOL_DIR);
    dir.is_dir().then_some(dir)
}
