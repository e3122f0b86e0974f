// Source Snapshot - editor text handed to the external tool via a file

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name the external tool reads when no input path is given
pub const FIXED_SNAPSHOT_NAME: &str = "code";

/// How snapshot paths are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotStrategy {
    /// One path per call: document key + nonce
    #[default]
    Unique,
    /// One shared path for every call (last write wins)
    Fixed,
}

/// Immutable capture of a document's text on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSnapshot {
    pub path: PathBuf,
    pub strategy: SnapshotStrategy,
}

impl SourceSnapshot {
    /// Compute the snapshot path inside `scratch_dir`
    pub fn path_for(
        scratch_dir: &Path,
        strategy: SnapshotStrategy,
        document_key: &str,
        nonce: &str,
    ) -> PathBuf {
        match strategy {
            SnapshotStrategy::Fixed => scratch_dir.join(FIXED_SNAPSHOT_NAME),
            SnapshotStrategy::Unique => {
                scratch_dir.join(format!("{FIXED_SNAPSHOT_NAME}-{document_key}-{nonce}"))
            }
        }
    }

    /// Unique snapshots are removed once the invocation is over
    pub fn is_disposable(&self) -> bool {
        self.strategy == SnapshotStrategy::Unique
    }
}
