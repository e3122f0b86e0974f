// External Tool Bridge
// snapshot -> build command -> invoke -> read result file -> deliver

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::application::cancel::CancelToken;
use crate::application::constants::TESTBENCH_LANGUAGE;
use crate::application::settings::BridgeSettings;
use crate::domain::{
    export_path_for, Delivery, Document, OutputConvention, Platform, SourceSnapshot, TextEdit,
    ToolInvocation, ToolMode, ToolResult,
};
use crate::error::{BridgeError, Result};
use crate::port::{
    EditorHost, ExecutionError, ExecutionStatus, FileStore, IdProvider, ToolOutput, ToolRunner,
};

/// Per-call options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationOptions {
    /// Testbench template (ignored by other modes)
    pub template_path: Option<PathBuf>,
}

impl InvocationOptions {
    pub fn with_template(template_path: Option<PathBuf>) -> Self {
        Self { template_path }
    }
}

/// Owns the lifecycle of external tool invocations
pub struct ExternalToolBridge {
    settings: Arc<BridgeSettings>,
    runner: Arc<dyn ToolRunner>,
    files: Arc<dyn FileStore>,
    host: Arc<dyn EditorHost>,
    id_provider: Arc<dyn IdProvider>,
    platform: Platform,
}

impl ExternalToolBridge {
    pub fn new(
        settings: Arc<BridgeSettings>,
        runner: Arc<dyn ToolRunner>,
        files: Arc<dyn FileStore>,
        host: Arc<dyn EditorHost>,
        id_provider: Arc<dyn IdProvider>,
    ) -> Self {
        Self {
            settings,
            runner,
            files,
            host,
            id_provider,
            platform: Platform::current(),
        }
    }

    /// Resolve executables as if running on `platform`
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn settings(&self) -> &BridgeSettings {
        &self.settings
    }

    pub fn host(&self) -> &dyn EditorHost {
        self.host.as_ref()
    }

    pub fn files(&self) -> &dyn FileStore {
        self.files.as_ref()
    }

    /// Write the document text to its scratch location
    ///
    /// # Errors
    /// - BridgeError::Io if the scratch location is not writable
    pub async fn snapshot(&self, document: &Document) -> Result<SourceSnapshot> {
        let nonce = self.id_provider.generate_id();
        let strategy = self.settings.snapshot_strategy;
        let path = SourceSnapshot::path_for(
            &self.settings.scratch_dir,
            strategy,
            &document.snapshot_key(),
            &nonce,
        );

        self.files.write(&path, &document.text).await?;

        debug!(
            document = %document.id,
            path = %path.display(),
            strategy = ?strategy,
            "Snapshot written"
        );

        Ok(SourceSnapshot { path, strategy })
    }

    /// Describe the invocation for `mode` on `input_path`
    pub fn build_command(
        &self,
        mode: ToolMode,
        input_path: &Path,
        options: &InvocationOptions,
    ) -> ToolInvocation {
        let executable = self.settings.executable_for(mode.tool_kind(), self.platform);
        ToolInvocation::new(executable, mode, input_path, options.template_path.clone())
    }

    /// Execute the invocation and interpret its output
    ///
    /// A missing executable yields a failure result like a non-zero exit.
    ///
    /// # Errors
    /// - BridgeError::Timeout if the tool exceeds the configured timeout
    /// - BridgeError::Cancelled if `cancel` fires first
    /// - BridgeError::InvalidToolOutput if a successful run reports no path
    pub async fn invoke(
        &self,
        invocation: &ToolInvocation,
        cancel: CancelToken,
    ) -> Result<ToolResult> {
        let command = invocation.to_command();

        info!(mode = %invocation.mode, command = %command, "Invoking external tool");

        let output = match self
            .runner
            .run(&command, self.settings.timeout(), cancel)
            .await
        {
            Ok(output) => output,
            Err(ExecutionError::SpawnFailed(msg)) => {
                error!(mode = %invocation.mode, error = %msg, "External tool could not be started");
                return Ok(ToolResult::Failure {
                    stderr: msg,
                    exit_code: None,
                });
            }
            Err(e) => {
                warn!(mode = %invocation.mode, error = %e, "External tool did not complete");
                return Err(e.into());
            }
        };

        let result = interpret_output(
            &output,
            invocation.mode.output_convention(),
            &invocation.input_path,
        )?;

        if let ToolResult::Failure { stderr, exit_code } = &result {
            error!(
                mode = %invocation.mode,
                exit_code = ?exit_code,
                stderr = %stderr,
                "External tool failed"
            );
        }

        Ok(result)
    }

    /// Read the result file named by a successful invocation
    pub async fn read_payload(&self, artifact: &Path) -> Result<String> {
        Ok(self.files.read(artifact).await?)
    }

    /// Route a payload to the editor according to `mode`
    pub async fn deliver(
        &self,
        payload: String,
        mode: ToolMode,
        document: &Document,
    ) -> Result<Delivery> {
        let delivery = match mode {
            ToolMode::Instantiate => {
                self.host.write_clipboard(&payload).await?;
                Delivery::Clipboard(payload)
            }
            ToolMode::Testbench => {
                self.host.open_document(TESTBENCH_LANGUAGE, &payload).await?;
                Delivery::NewDocument {
                    language: TESTBENCH_LANGUAGE.to_string(),
                    content: payload,
                }
            }
            ToolMode::Preview => {
                self.host.set_preview_html(&payload).await?;
                Delivery::PreviewHtml(payload)
            }
            ToolMode::Export => {
                let source = document
                    .path
                    .as_deref()
                    .ok_or_else(|| BridgeError::DocumentNotSaved(document.id.clone()))?;
                let target = export_path_for(source);
                self.files.write(&target, &payload).await?;
                Delivery::Exported(target)
            }
            ToolMode::Format => {
                let edits = vec![TextEdit::replace_all(&document.text, payload)];
                self.host.apply_edits(document, &edits).await?;
                Delivery::Edits(edits)
            }
        };

        debug!(mode = %mode, document = %document.id, "Payload delivered");
        Ok(delivery)
    }

    /// Fail unless the document has a backing file on disk
    pub async fn ensure_saved(&self, document: &Document) -> Result<PathBuf> {
        match &document.path {
            Some(path) if self.files.exists(path).await => Ok(path.clone()),
            _ => Err(BridgeError::DocumentNotSaved(document.id.clone())),
        }
    }

    /// Snapshot, invoke and read the payload, without delivering it
    ///
    /// The snapshot is released before returning, whatever the outcome.
    pub async fn generate(
        &self,
        mode: ToolMode,
        document: &Document,
        options: &InvocationOptions,
        cancel: CancelToken,
    ) -> Result<String> {
        let snapshot = self.snapshot(document).await?;
        let outcome = self.generate_from(&snapshot, mode, options, cancel).await;
        self.release(&snapshot).await;
        outcome
    }

    async fn generate_from(
        &self,
        snapshot: &SourceSnapshot,
        mode: ToolMode,
        options: &InvocationOptions,
        cancel: CancelToken,
    ) -> Result<String> {
        let invocation = self.build_command(mode, &snapshot.path, options);

        match self.invoke(&invocation, cancel).await? {
            ToolResult::Success { artifact } => self.read_payload(&artifact).await,
            ToolResult::Failure { stderr, exit_code } => {
                Err(BridgeError::ToolExecutionFailed { stderr, exit_code })
            }
        }
    }

    /// Full round trip: generate then deliver
    pub async fn run(
        &self,
        mode: ToolMode,
        document: &Document,
        options: &InvocationOptions,
        cancel: CancelToken,
    ) -> Result<Delivery> {
        if mode == ToolMode::Export {
            self.ensure_saved(document).await?;
        }

        let payload = self.generate(mode, document, options, cancel).await?;
        self.deliver(payload, mode, document).await
    }

    async fn release(&self, snapshot: &SourceSnapshot) {
        if !snapshot.is_disposable() {
            return;
        }
        if let Err(e) = self.files.remove(&snapshot.path).await {
            warn!(path = %snapshot.path.display(), error = %e, "Failed to remove snapshot");
        }
    }
}

/// Map raw process output to a ToolResult
///
/// Failure: non-zero exit or anything on stderr. Success under
/// `ReportedPath`: the last non-empty stdout line, line terminators stripped.
pub fn interpret_output(
    output: &ToolOutput,
    convention: OutputConvention,
    input_path: &Path,
) -> Result<ToolResult> {
    let stderr = output.stderr.trim();
    if output.status != ExecutionStatus::Success
        || output.exit_code != Some(0)
        || !stderr.is_empty()
    {
        return Ok(ToolResult::Failure {
            stderr: stderr.to_string(),
            exit_code: output.exit_code,
        });
    }

    match convention {
        OutputConvention::InPlace => Ok(ToolResult::Success {
            artifact: input_path.to_path_buf(),
        }),
        OutputConvention::ReportedPath => {
            let reported = output
                .stdout
                .lines()
                .map(|line| line.trim_end_matches(['\r', '\n']))
                .filter(|line| !line.trim().is_empty())
                .last()
                .ok_or_else(|| {
                    BridgeError::InvalidToolOutput("tool reported no result path".to_string())
                })?;

            Ok(ToolResult::Success {
                artifact: PathBuf::from(reported),
            })
        }
    }
}
