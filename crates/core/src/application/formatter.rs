// Formatter Service - whole-document formatting through the formatter tool

use std::sync::Arc;
use tracing::{debug, error};

use crate::application::bridge::{ExternalToolBridge, InvocationOptions};
use crate::application::cancel::CancelToken;
use crate::domain::{Delivery, Document, TextEdit, ToolMode};
use crate::error::Result;

pub struct FormatterService {
    bridge: Arc<ExternalToolBridge>,
}

impl FormatterService {
    pub fn new(bridge: Arc<ExternalToolBridge>) -> Self {
        Self { bridge }
    }

    pub fn is_enabled(&self) -> bool {
        self.bridge.settings().enable_formatter
    }

    /// Format `document` and apply the full-range replacement through the host
    ///
    /// Returns no edits when the formatter is disabled.
    pub async fn format(&self, document: &Document, cancel: CancelToken) -> Result<Vec<TextEdit>> {
        if !self.is_enabled() {
            debug!(document = %document.id, "Formatter disabled");
            return Ok(Vec::new());
        }

        match self
            .bridge
            .run(ToolMode::Format, document, &InvocationOptions::default(), cancel)
            .await?
        {
            Delivery::Edits(edits) => Ok(edits),
            _ => Ok(Vec::new()),
        }
    }

    /// Formatting provider entry point: failures are logged and yield no edits
    pub async fn provide_edits(&self, document: &Document) -> Vec<TextEdit> {
        match self.format(document, CancelToken::never()).await {
            Ok(edits) => edits,
            Err(e) => {
                error!(document = %document.id, error = %e, "Formatting failed");
                Vec::new()
            }
        }
    }
}
