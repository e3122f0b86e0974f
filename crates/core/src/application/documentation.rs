// Documentation Service - live preview panel and HTML export
//
// The preview is single-flight: a newer refresh cancels the invocation
// still running for an older one, and results of superseded refreshes
// are dropped instead of overwriting the panel.

use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use crate::application::bridge::{ExternalToolBridge, InvocationOptions};
use crate::application::cancel::{cancel_channel, CancelHandle, CancelToken};
use crate::application::constants::{
    MSG_EXPORTED_PREFIX, MSG_SAVE_FIRST, PREVIEW_ASSET_DIR, PREVIEW_TITLE, PREVIEW_VIEW_TYPE,
};
use crate::domain::{Delivery, Document, PreviewRequest, ToolMode, WebviewMessage};
use crate::error::{BridgeError, Result};
use crate::port::PreviewPanelOptions;

#[derive(Default)]
struct PreviewState {
    open: bool,
    current: Option<Document>,
    generation: u64,
    in_flight: Option<CancelHandle>,
}

pub struct DocumentationService {
    bridge: Arc<ExternalToolBridge>,
    state: Mutex<PreviewState>,
}

impl DocumentationService {
    pub fn new(bridge: Arc<ExternalToolBridge>) -> Self {
        Self {
            bridge,
            state: Mutex::new(PreviewState::default()),
        }
    }

    pub fn panel_options(&self) -> PreviewPanelOptions {
        PreviewPanelOptions {
            view_type: PREVIEW_VIEW_TYPE.to_string(),
            title: PREVIEW_TITLE.to_string(),
            enable_scripts: true,
            retain_context_when_hidden: true,
            local_resource_roots: vec![self.bridge.settings().tool_dir.join(PREVIEW_ASSET_DIR)],
        }
    }

    pub fn is_open(&self) -> bool {
        self.lock().open
    }

    /// Document currently shown in the preview
    pub fn current_document(&self) -> Option<Document> {
        self.lock().current.clone()
    }

    /// Open the panel (once) and render the active document
    ///
    /// Returns `None` when the render was superseded by a newer one.
    pub async fn open_preview(&self) -> Result<Option<Delivery>> {
        let document = self
            .bridge
            .host()
            .active_document()
            .await
            .ok_or(BridgeError::NoActiveDocument)?;

        let create_panel = {
            let mut state = self.lock();
            !std::mem::replace(&mut state.open, true)
        };
        if create_panel {
            info!("Opening documentation preview panel");
            if let Err(e) = self
                .bridge
                .host()
                .open_preview_panel(&self.panel_options())
                .await
            {
                // no panel exists: the next open must create it again
                self.lock().open = false;
                return Err(e);
            }
        }

        self.update_preview(document).await
    }

    /// Re-render the preview for `document`; no-op while the panel is closed
    pub async fn update_preview(&self, document: Document) -> Result<Option<Delivery>> {
        let (generation, cancel) = match self.begin_render(&document) {
            Some(started) => started,
            None => return Ok(None),
        };

        let outcome = self
            .bridge
            .generate(
                ToolMode::Preview,
                &document,
                &InvocationOptions::default(),
                cancel,
            )
            .await;

        if !self.finish_render(generation) {
            debug!(document = %document.id, generation, "Preview render superseded");
            return Ok(None);
        }

        let html = outcome?;
        self.bridge
            .deliver(html, ToolMode::Preview, &document)
            .await
            .map(Some)
    }

    fn begin_render(&self, document: &Document) -> Option<(u64, CancelToken)> {
        let mut state = self.lock();
        if !state.open {
            return None;
        }

        if let Some(previous) = state.in_flight.take() {
            previous.cancel();
        }

        let (handle, token) = cancel_channel();
        state.generation += 1;
        state.in_flight = Some(handle);
        state.current = Some(document.clone());
        Some((state.generation, token))
    }

    /// True if `generation` is still the latest render of an open panel
    fn finish_render(&self, generation: u64) -> bool {
        let mut state = self.lock();
        if state.open && state.generation == generation {
            state.in_flight = None;
            true
        } else {
            false
        }
    }

    /// Refresh for documents opened or saved while the panel is visible
    pub async fn on_document_changed(&self, document: Document) -> Result<Option<Delivery>> {
        if !document.is_hdl() {
            return Ok(None);
        }
        self.update_preview(document).await
    }

    /// Follow the last visible editor
    pub async fn on_visible_editors_changed(
        &self,
        documents: &[Document],
    ) -> Result<Option<Delivery>> {
        match documents.last() {
            Some(document) => self.on_document_changed(document.clone()).await,
            None => Ok(None),
        }
    }

    /// Panel closed by the user: forget it and drop any pending render
    pub fn on_panel_disposed(&self) {
        let mut state = self.lock();
        if let Some(previous) = state.in_flight.take() {
            previous.cancel();
        }
        state.open = false;
        state.current = None;
        state.generation += 1;
    }

    /// Handle a message posted by the preview webview
    pub async fn on_webview_message(&self, raw: &str) -> Result<Option<Delivery>> {
        let message = WebviewMessage::parse(raw)?;

        match message.request() {
            Some(PreviewRequest::ExportHtml) => {
                let document = self
                    .current_document()
                    .ok_or(BridgeError::NoActiveDocument)?;
                self.export(&document).await.map(Some)
            }
            None => {
                debug!(command = %message.command, "Ignoring webview message");
                Ok(None)
            }
        }
    }

    /// Export documentation for the active document
    pub async fn export_active(&self) -> Result<Delivery> {
        let document = self
            .bridge
            .host()
            .active_document()
            .await
            .ok_or(BridgeError::NoActiveDocument)?;
        self.export(&document).await
    }

    /// Export documentation as HTML beside the document's source file
    ///
    /// # Errors
    /// - BridgeError::DocumentNotSaved if the document has no file on disk;
    ///   the tool is not invoked
    pub async fn export(&self, document: &Document) -> Result<Delivery> {
        if let Err(e) = self.bridge.ensure_saved(document).await {
            self.bridge.host().show_warning(MSG_SAVE_FIRST).await;
            return Err(e);
        }

        let delivery = self
            .bridge
            .run(
                ToolMode::Export,
                document,
                &InvocationOptions::default(),
                CancelToken::never(),
            )
            .await?;

        if let Delivery::Exported(path) = &delivery {
            info!(path = %path.display(), "Documentation exported");
            self.bridge
                .host()
                .show_info(&format!("{MSG_EXPORTED_PREFIX} {}", path.display()))
                .await;
        }

        Ok(delivery)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PreviewState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::settings::{BridgeSettings, ToolOverride};
    use crate::domain::Platform;
    use crate::port::editor_host::mocks::{HostEvent, RecordingEditorHost};
    use crate::port::file_store::mocks::InMemoryFileStore;
    use crate::port::id_provider::SequentialIdProvider;
    use crate::port::tool_runner::mocks::MockToolRunner;
    use std::path::{Path, PathBuf};

    struct Fixture {
        service: DocumentationService,
        runner: Arc<MockToolRunner>,
        files: Arc<InMemoryFileStore>,
        host: Arc<RecordingEditorHost>,
    }

    fn fixture(active: Option<Document>) -> Fixture {
        let settings = BridgeSettings {
            tool_dir: PathBuf::from("/opt/hyhdl/pyTools"),
            tool: Some(ToolOverride {
                program: PathBuf::from("hyhdl"),
                args: vec![],
            }),
            scratch_dir: PathBuf::from("/scratch"),
            ..Default::default()
        };
        let runner = Arc::new(MockToolRunner::reporting("/tmp/preview.html"));
        let files = Arc::new(InMemoryFileStore::new());
        files.insert("/tmp/preview.html", "<html>preview</html>");
        let host = Arc::new(RecordingEditorHost::new());
        host.set_active_document(active);

        let bridge = ExternalToolBridge::new(
            Arc::new(settings),
            runner.clone(),
            files.clone(),
            host.clone(),
            Arc::new(SequentialIdProvider::default()),
        )
        .with_platform(Platform::Unix);

        Fixture {
            service: DocumentationService::new(Arc::new(bridge)),
            runner,
            files,
            host,
        }
    }

    fn doc() -> Document {
        Document::from_path("/work/spi.v", "module spi; endmodule")
    }

    #[tokio::test]
    async fn test_open_preview_creates_panel_once() {
        let fx = fixture(Some(doc()));

        fx.service.open_preview().await.unwrap();
        fx.service.open_preview().await.unwrap();

        let panels: Vec<_> = fx
            .host
            .events()
            .into_iter()
            .filter(|e| matches!(e, HostEvent::PreviewPanelOpened(_)))
            .collect();
        assert_eq!(panels.len(), 1);
        assert_eq!(fx.runner.call_count(), 2);

        match &panels[0] {
            HostEvent::PreviewPanelOpened(options) => {
                assert_eq!(options.title, "Preview: documentation");
                assert_eq!(
                    options.local_resource_roots,
                    vec![PathBuf::from("/opt/hyhdl/pyTools/wavedrom")]
                );
            }
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn test_failed_panel_creation_is_retried() {
        let fx = fixture(Some(doc()));
        fx.host.fail_next_panel();

        assert!(fx.service.open_preview().await.is_err());
        assert!(!fx.service.is_open());
        assert_eq!(fx.runner.call_count(), 0);

        let delivery = fx.service.open_preview().await.unwrap();

        assert!(fx.service.is_open());
        assert_eq!(
            delivery,
            Some(Delivery::PreviewHtml("<html>preview</html>".to_string()))
        );
        let panels = fx
            .host
            .events()
            .into_iter()
            .filter(|e| matches!(e, HostEvent::PreviewPanelOpened(_)))
            .count();
        assert_eq!(panels, 1);
    }

    #[tokio::test]
    async fn test_preview_renders_html() {
        let fx = fixture(Some(doc()));

        let delivery = fx.service.open_preview().await.unwrap();

        assert_eq!(
            delivery,
            Some(Delivery::PreviewHtml("<html>preview</html>".to_string()))
        );
        assert_eq!(fx.service.current_document(), Some(doc()));
    }

    #[tokio::test]
    async fn test_updates_ignored_while_closed() {
        let fx = fixture(Some(doc()));

        let delivery = fx.service.on_document_changed(doc()).await.unwrap();

        assert!(delivery.is_none());
        assert_eq!(fx.runner.call_count(), 0);
    }

    #[tokio::test]
    async fn test_non_hdl_documents_ignored() {
        let fx = fixture(Some(doc()));
        fx.service.open_preview().await.unwrap();

        let readme = Document::from_path("/work/README.md", "# notes");
        let delivery = fx.service.on_document_changed(readme).await.unwrap();

        assert!(delivery.is_none());
        assert_eq!(fx.runner.call_count(), 1);
    }

    #[tokio::test]
    async fn test_visible_editors_follow_last() {
        let fx = fixture(Some(doc()));
        fx.service.open_preview().await.unwrap();

        let other = Document::from_path("/work/i2c.sv", "module i2c; endmodule");
        fx.service
            .on_visible_editors_changed(&[doc(), other.clone()])
            .await
            .unwrap();

        assert_eq!(fx.service.current_document(), Some(other));
        assert!(fx
            .service
            .on_visible_editors_changed(&[])
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_dispose_resets_panel() {
        let fx = fixture(Some(doc()));
        fx.service.open_preview().await.unwrap();

        fx.service.on_panel_disposed();

        assert!(!fx.service.is_open());
        assert!(fx.service.current_document().is_none());

        fx.service.open_preview().await.unwrap();
        let panels = fx
            .host
            .events()
            .into_iter()
            .filter(|e| matches!(e, HostEvent::PreviewPanelOpened(_)))
            .count();
        assert_eq!(panels, 2);
    }

    #[tokio::test]
    async fn test_webview_export_message() {
        let fx = fixture(Some(doc()));
        fx.files.insert("/work/spi.v", "module spi; endmodule");
        fx.service.open_preview().await.unwrap();

        let delivery = fx
            .service
            .on_webview_message(r#"{"command":"export","text":"html"}"#)
            .await
            .unwrap();

        assert_eq!(
            delivery,
            Some(Delivery::Exported(PathBuf::from("/work/spi.html")))
        );
        assert!(fx.files.get(Path::new("/work/spi.html")).is_some());
        assert_eq!(
            fx.host.infos(),
            vec!["hyhdl: The README document has been exported to /work/spi.html".to_string()]
        );
    }

    #[tokio::test]
    async fn test_unknown_webview_message_ignored() {
        let fx = fixture(Some(doc()));

        let delivery = fx
            .service
            .on_webview_message(r#"{"command":"ping"}"#)
            .await
            .unwrap();

        assert!(delivery.is_none());
        assert_eq!(fx.runner.call_count(), 0);
    }

    #[tokio::test]
    async fn test_export_unsaved_warns_without_invoking() {
        let untitled = Document::untitled("untitled-2", "verilog", "module x; endmodule");
        let fx = fixture(Some(untitled));

        let result = fx.service.export_active().await;

        assert!(matches!(result, Err(BridgeError::DocumentNotSaved(_))));
        assert_eq!(fx.runner.call_count(), 0);
        assert_eq!(fx.host.warnings(), vec![MSG_SAVE_FIRST.to_string()]);
    }

    #[tokio::test]
    async fn test_export_path_not_on_disk_is_unsaved() {
        // Backing path known to the host but never written
        let fx = fixture(Some(doc()));

        let result = fx.service.export_active().await;

        assert!(matches!(result, Err(BridgeError::DocumentNotSaved(_))));
        assert_eq!(fx.runner.call_count(), 0);
    }
}
