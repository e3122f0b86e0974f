// Document Domain Model

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Document identifier (host URI or file path)
pub type DocumentId = String;

/// Language tags the documentation preview follows
pub const HDL_LANGUAGES: [&str; 2] = ["verilog", "systemverilog"];

/// Text buffer as seen by the editor host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    /// Backing file, `None` for untitled buffers
    pub path: Option<PathBuf>,
    pub language_id: String,
    pub text: String,
}

impl Document {
    pub fn new(
        id: impl Into<String>,
        path: Option<PathBuf>,
        language_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            path,
            language_id: language_id.into(),
            text: text.into(),
        }
    }

    /// Document backed by a file, language inferred from the extension
    pub fn from_path(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let path = path.into();
        let language_id = language_for_path(&path).to_string();
        Self {
            id: path.display().to_string(),
            path: Some(path),
            language_id,
            text: text.into(),
        }
    }

    /// Untitled buffer with no backing file
    pub fn untitled(
        id: impl Into<String>,
        language_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self::new(id, None, language_id, text)
    }

    pub fn is_hdl(&self) -> bool {
        HDL_LANGUAGES.contains(&self.language_id.as_str())
    }

    /// Filesystem-safe key used to name snapshots of this document
    pub fn snapshot_key(&self) -> String {
        let stem = self
            .path
            .as_deref()
            .and_then(Path::file_stem)
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "untitled".to_string());

        let key: String = stem
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();

        if key.is_empty() {
            "untitled".to_string()
        } else {
            key
        }
    }
}

/// Infer a host language tag from a file extension
pub fn language_for_path(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("v") | Some("vh") | Some("vl") => "verilog",
        Some("sv") | Some("svh") => "systemverilog",
        _ => "plaintext",
    }
}

/// Destination of exported documentation: the source path with `.html`
pub fn export_path_for(source: &Path) -> PathBuf {
    source.with_extension("html")
}
