//! Shared fixtures: fake external tools written as shell scripts

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use hyhdl_core::application::{BridgeSettings, CommandService, ExternalToolBridge, ToolOverride};
use hyhdl_core::domain::Document;
use hyhdl_core::port::editor_host::mocks::RecordingEditorHost;
use hyhdl_core::port::id_provider::UuidProvider;
use hyhdl_core::port::time_provider::SystemTimeProvider;
use hyhdl_infra_system::{LocalFileStore, SubprocessToolRunner};
use tempfile::TempDir;

/// Generator stand-in: writes `<input>.out` and prints its path with CRLF
pub const FAKE_HYHDL: &str = r#"
mode="$1"
input="$2"
out="$input.out"
case "$mode" in
  -i) { printf 'INST:'; cat "$input"; } > "$out" ;;
  -t)
    if [ "$3" = "-T" ]; then
      { printf 'TPL:'; cat "$4"; printf '|'; cat "$input"; } > "$out"
    else
      { printf 'TB:'; cat "$input"; } > "$out"
    fi
    ;;
  -p) { printf '<html><body>'; cat "$input"; printf '</body></html>'; } > "$out" ;;
  -e) { printf '<html>EXPORT:'; cat "$input"; printf '</html>'; } > "$out" ;;
  *) echo "unknown option $mode" >&2; exit 2 ;;
esac
printf '%s\r\n' "$out"
"#;

/// Formatter stand-in: upper-cases its input in place
pub const FAKE_FORMATTER: &str = r#"
tr 'a-z' 'A-Z' < "$2" > "$2.tmp" && mv "$2.tmp" "$2"
"#;

pub const FAILING_TOOL: &str = r#"
echo "Traceback (most recent call last): ParseError" >&2
exit 1
"#;

pub const HANGING_TOOL: &str = r#"
sleep 10
"#;

/// Generator that waits before reading its input
pub fn slow_hyhdl(delay: &str) -> String {
    format!("sleep {delay}\n{FAKE_HYHDL}")
}

pub struct Harness {
    pub dir: TempDir,
    pub host: Arc<RecordingEditorHost>,
    pub bridge: Arc<ExternalToolBridge>,
}

impl Harness {
    pub fn new(tool: &str) -> Self {
        Self::with_settings(tool, |_| {})
    }

    pub fn with_settings(tool: &str, configure: impl FnOnce(&mut BridgeSettings)) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let tools = dir.path().join("tools");
        std::fs::create_dir_all(&tools).expect("tools dir");

        let hyhdl = write_script(&tools, "hyhdl.sh", tool);
        let formatter = write_script(&tools, "verilogFormatter.sh", FAKE_FORMATTER);

        let mut settings = BridgeSettings {
            tool_dir: tools,
            tool: Some(ToolOverride {
                program: PathBuf::from("sh"),
                args: vec![hyhdl.to_string_lossy().into_owned()],
            }),
            formatter: Some(ToolOverride {
                program: PathBuf::from("sh"),
                args: vec![formatter.to_string_lossy().into_owned()],
            }),
            scratch_dir: dir.path().join("scratch"),
            tool_timeout_ms: 10_000,
            ..Default::default()
        };
        configure(&mut settings);

        let host = Arc::new(RecordingEditorHost::new());
        let runner = Arc::new(SubprocessToolRunner::new(
            Arc::new(SystemTimeProvider),
            settings.env_allowlist.clone(),
        ));
        let bridge = Arc::new(ExternalToolBridge::new(
            Arc::new(settings),
            runner,
            Arc::new(LocalFileStore::new()),
            host.clone(),
            Arc::new(UuidProvider),
        ));

        Self { dir, host, bridge }
    }

    pub fn commands(&self) -> CommandService {
        CommandService::new(self.bridge.clone())
    }

    /// Source file saved on disk inside the harness directory
    pub fn saved_document(&self, name: &str, text: &str) -> Document {
        let path = self.dir.path().join("rtl").join(name);
        std::fs::create_dir_all(path.parent().expect("parent")).expect("rtl dir");
        std::fs::write(&path, text).expect("write source");
        Document::from_path(path, text)
    }

    pub fn scratch_dir(&self) -> PathBuf {
        self.dir.path().join("scratch")
    }

    /// Snapshot files left in the scratch dir (tool outputs excluded)
    pub fn leftover_snapshots(&self) -> Vec<PathBuf> {
        match std::fs::read_dir(self.scratch_dir()) {
            Ok(entries) => entries
                .filter_map(|e| e.ok().map(|e| e.path()))
                .filter(|p| p.extension().map_or(true, |ext| ext != "out"))
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}")).expect("write script");
    path
}
