// Messages posted by the documentation webview

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, Result};

/// Raw message as posted by the webview script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebviewMessage {
    pub command: String,
    #[serde(default)]
    pub text: Option<String>,
}

/// Requests the preview panel understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewRequest {
    ExportHtml,
}

impl WebviewMessage {
    pub fn parse(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| DomainError::InvalidMessage(e.to_string()))
    }

    /// Interpret the message; `None` for messages the bridge does not handle
    pub fn request(&self) -> Option<PreviewRequest> {
        match (self.command.as_str(), self.text.as_deref()) {
            ("export", Some("html")) => Some(PreviewRequest::ExportHtml),
            _ => None,
        }
    }
}
