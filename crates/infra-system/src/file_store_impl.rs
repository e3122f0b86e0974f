// Filesystem-backed FileStore (tokio::fs)
use async_trait::async_trait;
use std::io;
use std::path::Path;
use tracing::debug;

use hyhdl_core::port::FileStore;

/// FileStore over the local filesystem, text read and written as UTF-8
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileStore;

impl LocalFileStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, content).await?;
        debug!(path = %path.display(), bytes = content.len(), "File written");
        Ok(())
    }

    async fn read(&self, path: &Path) -> io::Result<String> {
        tokio::fs::read_to_string(path).await
    }

    async fn remove(&self, path: &Path) -> io::Result<()> {
        tokio::fs::remove_file(path).await
    }

    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_read_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("code");
        let store = LocalFileStore::new();

        let text = "module top(\n  input  wire clk, // 时钟\n);\nendmodule\n";
        store.write(&path, text).await.unwrap();

        assert!(store.exists(&path).await);
        assert_eq!(store.read(&path).await.unwrap(), text);
    }

    #[tokio::test]
    async fn test_remove() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("code-top-1");
        let store = LocalFileStore::new();

        store.write(&path, "module top; endmodule").await.unwrap();
        store.remove(&path).await.unwrap();

        assert!(!store.exists(&path).await);
        assert!(store.remove(&path).await.is_err());
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new();

        let err = store.read(&dir.path().join("missing")).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
