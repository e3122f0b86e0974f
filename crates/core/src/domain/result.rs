// Tool Result & Delivery

use std::path::PathBuf;

use crate::domain::text_edit::TextEdit;

/// Outcome of one invocation, after interpreting the raw process output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolResult {
    /// Path of the file holding the actual payload
    Success { artifact: PathBuf },
    /// Captured diagnostics, nothing was read
    Failure {
        stderr: String,
        exit_code: Option<i32>,
    },
}

impl ToolResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ToolResult::Success { .. })
    }
}

/// Editor-visible side effect produced from a payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Clipboard(String),
    NewDocument { language: String, content: String },
    PreviewHtml(String),
    Exported(PathBuf),
    Edits(Vec<TextEdit>),
}
