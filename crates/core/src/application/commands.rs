// Command Service - entry point for the host's command palette

use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::application::bridge::ExternalToolBridge;
use crate::application::cancel::CancelToken;
use crate::application::code_template::CodeTemplateService;
use crate::application::documentation::DocumentationService;
use crate::application::formatter::FormatterService;
use crate::domain::{Delivery, HdlCommand};
use crate::error::{BridgeError, Result};

pub struct CommandService {
    code_template: CodeTemplateService,
    documentation: DocumentationService,
    formatter: FormatterService,
}

impl CommandService {
    pub fn new(bridge: Arc<ExternalToolBridge>) -> Self {
        Self {
            code_template: CodeTemplateService::new(bridge.clone()),
            documentation: DocumentationService::new(bridge.clone()),
            formatter: FormatterService::new(bridge),
        }
    }

    pub fn code_template(&self) -> &CodeTemplateService {
        &self.code_template
    }

    pub fn documentation(&self) -> &DocumentationService {
        &self.documentation
    }

    pub fn formatter(&self) -> &FormatterService {
        &self.formatter
    }

    /// Run a command and return its typed outcome
    ///
    /// `None` means the preview render was superseded.
    pub async fn execute(
        &self,
        command: HdlCommand,
        cancel: CancelToken,
    ) -> Result<Option<Delivery>> {
        debug!(command = %command, "Executing command");

        match command {
            HdlCommand::InstantiateModule => self.code_template.instantiate(cancel).await.map(Some),
            HdlCommand::GenerateTestbench => self.code_template.testbench(cancel).await.map(Some),
            HdlCommand::ShowDocumentationPreview => self.documentation.open_preview().await,
            HdlCommand::ExportDocumentationAsHtml => {
                self.documentation.export_active().await.map(Some)
            }
        }
    }

    /// Run a command by its registered id
    pub async fn dispatch(&self, id: &str, cancel: CancelToken) -> Result<Option<Delivery>> {
        let command: HdlCommand = id.parse()?;
        self.execute(command, cancel).await
    }

    /// Run a command the way the host does: failures end the action quietly
    ///
    /// Missing documents are ignored, tool failures are logged only,
    /// user-actionable conditions were already shown as warnings.
    pub async fn execute_reported(&self, command: HdlCommand) -> Option<Delivery> {
        match self.execute(command, CancelToken::never()).await {
            Ok(delivery) => delivery,
            Err(e) => {
                report(command, &e);
                None
            }
        }
    }
}

fn report(command: HdlCommand, err: &BridgeError) {
    match err {
        BridgeError::NoActiveDocument | BridgeError::Cancelled => {
            debug!(command = %command, reason = %err, "Command skipped");
        }
        e if e.is_user_actionable() => {
            warn!(command = %command, error = %e, "Command aborted");
        }
        e => {
            error!(command = %command, error = %e, "Command failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::settings::{BridgeSettings, ToolOverride};
    use crate::domain::{Document, Platform};
    use crate::port::editor_host::mocks::RecordingEditorHost;
    use crate::port::file_store::mocks::InMemoryFileStore;
    use crate::port::id_provider::SequentialIdProvider;
    use crate::port::tool_runner::mocks::MockToolRunner;
    use std::path::PathBuf;

    fn commands(
        runner: Arc<MockToolRunner>,
        files: Arc<InMemoryFileStore>,
        host: Arc<RecordingEditorHost>,
    ) -> CommandService {
        let settings = BridgeSettings {
            tool: Some(ToolOverride {
                program: PathBuf::from("hyhdl"),
                args: vec![],
            }),
            scratch_dir: PathBuf::from("/scratch"),
            ..Default::default()
        };
        let bridge = ExternalToolBridge::new(
            Arc::new(settings),
            runner,
            files,
            host,
            Arc::new(SequentialIdProvider::default()),
        )
        .with_platform(Platform::Unix);
        CommandService::new(Arc::new(bridge))
    }

    #[tokio::test]
    async fn test_dispatch_by_id() {
        let runner = Arc::new(MockToolRunner::reporting("/tmp/inst.v"));
        let files = Arc::new(InMemoryFileStore::new());
        files.insert("/tmp/inst.v", "fifo u_fifo();");
        let host = Arc::new(RecordingEditorHost::with_document(Document::from_path(
            "/work/fifo.v",
            "module fifo; endmodule",
        )));
        let svc = commands(runner, files, host);

        let delivery = svc
            .dispatch("hyhdl.instantiation", CancelToken::never())
            .await
            .unwrap();

        assert_eq!(delivery, Some(Delivery::Clipboard("fifo u_fifo();".to_string())));
    }

    #[tokio::test]
    async fn test_dispatch_unknown_id() {
        let svc = commands(
            Arc::new(MockToolRunner::reporting("/tmp/x")),
            Arc::new(InMemoryFileStore::new()),
            Arc::new(RecordingEditorHost::new()),
        );

        let result = svc.dispatch("hyhdl.synthesize", CancelToken::never()).await;
        assert!(matches!(result, Err(BridgeError::Domain(_))));
    }

    #[tokio::test]
    async fn test_reported_failure_is_silent() {
        let runner = Arc::new(MockToolRunner::failing(1, "Traceback (most recent call last)"));
        let host = Arc::new(RecordingEditorHost::with_document(Document::from_path(
            "/work/fifo.v",
            "module fifo; endmodule",
        )));
        let svc = commands(runner.clone(), Arc::new(InMemoryFileStore::new()), host.clone());

        let delivery = svc.execute_reported(HdlCommand::GenerateTestbench).await;

        assert!(delivery.is_none());
        assert_eq!(runner.call_count(), 1);
        assert!(host.events().is_empty());
    }

    #[tokio::test]
    async fn test_reported_without_document_is_silent() {
        let runner = Arc::new(MockToolRunner::reporting("/tmp/x"));
        let host = Arc::new(RecordingEditorHost::new());
        let svc = commands(runner.clone(), Arc::new(InMemoryFileStore::new()), host.clone());

        for command in HdlCommand::ALL {
            assert!(svc.execute_reported(command).await.is_none());
        }
        assert_eq!(runner.call_count(), 0);
        assert!(host.events().is_empty());
    }
}
