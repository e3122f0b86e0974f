//! EditorHost for the command line: results go to stdout or a file

use async_trait::async_trait;
use colored::Colorize;
use std::path::PathBuf;
use tracing::debug;

use hyhdl_core::domain::{Document, TextEdit, TextRange};
use hyhdl_core::port::{EditorHost, PreviewPanelOptions};
use hyhdl_core::{BridgeError, Result};

/// Where delivered text ends up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

pub struct TerminalHost {
    document: Document,
    output: OutputTarget,
    /// Formatting rewrites the source file instead of printing
    write_in_place: bool,
}

impl TerminalHost {
    pub fn new(document: Document, output: OutputTarget) -> Self {
        Self {
            document,
            output,
            write_in_place: false,
        }
    }

    pub fn write_in_place(mut self, enabled: bool) -> Self {
        self.write_in_place = enabled;
        self
    }

    async fn emit(&self, text: &str) -> Result<()> {
        match &self.output {
            OutputTarget::Stdout => {
                print!("{text}");
                if !text.ends_with('\n') {
                    println!();
                }
            }
            OutputTarget::File(path) => {
                tokio::fs::write(path, text).await?;
                debug!(path = %path.display(), "Result written");
            }
        }
        Ok(())
    }
}

/// Apply whole-document edits to `original`
pub fn apply_full_range(original: &str, edits: &[TextEdit]) -> Result<String> {
    edits.iter().try_fold(original.to_string(), |current, edit| {
        if edit.range == TextRange::full(&current) {
            Ok(edit.new_text.clone())
        } else {
            Err(BridgeError::Internal(
                "only whole-document edits are supported".to_string(),
            ))
        }
    })
}

#[async_trait]
impl EditorHost for TerminalHost {
    async fn active_document(&self) -> Option<Document> {
        Some(self.document.clone())
    }

    async fn write_clipboard(&self, text: &str) -> Result<()> {
        self.emit(text).await
    }

    async fn open_document(&self, language: &str, content: &str) -> Result<()> {
        debug!(language = %language, "Opening generated document");
        self.emit(content).await
    }

    async fn open_preview_panel(&self, options: &PreviewPanelOptions) -> Result<()> {
        debug!(title = %options.title, "Preview panel requested");
        Ok(())
    }

    async fn set_preview_html(&self, html: &str) -> Result<()> {
        self.emit(html).await
    }

    async fn apply_edits(&self, document: &Document, edits: &[TextEdit]) -> Result<()> {
        let formatted = apply_full_range(&document.text, edits)?;

        match (&document.path, self.write_in_place) {
            (Some(path), true) => {
                tokio::fs::write(path, &formatted).await?;
                debug!(path = %path.display(), "Document rewritten");
                Ok(())
            }
            _ => self.emit(&formatted).await,
        }
    }

    async fn show_info(&self, message: &str) {
        eprintln!("{} {}", "✓".green().bold(), message);
    }

    async fn show_warning(&self, message: &str) {
        eprintln!("{} {}", "!".yellow().bold(), message.yellow());
    }
}
