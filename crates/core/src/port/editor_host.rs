// Editor Host Port
// Everything the bridge needs from the editor it runs inside

use async_trait::async_trait;
use std::path::PathBuf;

use crate::domain::{Document, TextEdit};
use crate::error::Result;

/// Parameters for creating the documentation preview panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewPanelOptions {
    pub view_type: String,
    pub title: String,
    pub enable_scripts: bool,
    pub retain_context_when_hidden: bool,
    pub local_resource_roots: Vec<PathBuf>,
}

/// Editor host port
#[async_trait]
pub trait EditorHost: Send + Sync {
    /// Document in the focused editor, if any
    async fn active_document(&self) -> Option<Document>;

    async fn write_clipboard(&self, text: &str) -> Result<()>;

    /// Open a new untitled buffer with the given language tag
    async fn open_document(&self, language: &str, content: &str) -> Result<()>;

    /// Create the preview panel (called once per panel lifetime)
    async fn open_preview_panel(&self, options: &PreviewPanelOptions) -> Result<()>;

    /// Replace the preview panel content
    async fn set_preview_html(&self, html: &str) -> Result<()>;

    async fn apply_edits(&self, document: &Document, edits: &[TextEdit]) -> Result<()>;

    async fn show_info(&self, message: &str);

    async fn show_warning(&self, message: &str);
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::BridgeError;
    use std::sync::Mutex;

    /// Everything a host was asked to do, in order
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum HostEvent {
        Clipboard(String),
        OpenDocument { language: String, content: String },
        PreviewPanelOpened(PreviewPanelOptions),
        PreviewHtml(String),
        Edits { document_id: String, edits: Vec<TextEdit> },
        Info(String),
        Warning(String),
    }

    /// Host that records calls instead of touching a UI
    #[derive(Default)]
    pub struct RecordingEditorHost {
        active: Mutex<Option<Document>>,
        events: Mutex<Vec<HostEvent>>,
        fail_next_panel: Mutex<bool>,
    }

    impl RecordingEditorHost {
        pub fn new() -> Self {
            Self::default()
        }
        pub fn with_document(document: Document) -> Self {
            let host = Self::new();
            host.set_active_document(Some(document));
            host
        }
        pub fn set_active_document(&self, document: Option<Document>) {
            *self.active.lock().unwrap() = document;
        }
        /// Make the next `open_preview_panel` call fail
        pub fn fail_next_panel(&self) {
            *self.fail_next_panel.lock().unwrap() = true;
        }
        pub fn events(&self) -> Vec<HostEvent> {
            self.events.lock().unwrap().clone()
        }
        pub fn infos(&self) -> Vec<String> {
            self.events()
                .into_iter()
                .filter_map(|e| match e {
                    HostEvent::Info(msg) => Some(msg),
                    _ => None,
                })
                .collect()
        }
        pub fn warnings(&self) -> Vec<String> {
            self.events()
                .into_iter()
                .filter_map(|e| match e {
                    HostEvent::Warning(msg) => Some(msg),
                    _ => None,
                })
                .collect()
        }
        fn record(&self, event: HostEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[async_trait]
    impl EditorHost for RecordingEditorHost {
        async fn active_document(&self) -> Option<Document> {
            self.active.lock().unwrap().clone()
        }
        async fn write_clipboard(&self, text: &str) -> Result<()> {
            self.record(HostEvent::Clipboard(text.to_string()));
            Ok(())
        }
        async fn open_document(&self, language: &str, content: &str) -> Result<()> {
            self.record(HostEvent::OpenDocument {
                language: language.to_string(),
                content: content.to_string(),
            });
            Ok(())
        }
        async fn open_preview_panel(&self, options: &PreviewPanelOptions) -> Result<()> {
            if std::mem::take(&mut *self.fail_next_panel.lock().unwrap()) {
                return Err(BridgeError::Internal("webview creation failed".to_string()));
            }
            self.record(HostEvent::PreviewPanelOpened(options.clone()));
            Ok(())
        }
        async fn set_preview_html(&self, html: &str) -> Result<()> {
            self.record(HostEvent::PreviewHtml(html.to_string()));
            Ok(())
        }
        async fn apply_edits(&self, document: &Document, edits: &[TextEdit]) -> Result<()> {
            self.record(HostEvent::Edits {
                document_id: document.id.clone(),
                edits: edits.to_vec(),
            });
            Ok(())
        }
        async fn show_info(&self, message: &str) {
            self.record(HostEvent::Info(message.to_string()));
        }
        async fn show_warning(&self, message: &str) {
            self.record(HostEvent::Warning(message.to_string()));
        }
    }
}
