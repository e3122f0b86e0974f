// File Store Port
// Filesystem access for snapshots and result artifacts

use async_trait::async_trait;
use std::io;
use std::path::Path;

#[async_trait]
pub trait FileStore: Send + Sync {
    /// Write `content` to `path`, replacing any previous content
    async fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    async fn read(&self, path: &Path) -> io::Result<String>;

    async fn remove(&self, path: &Path) -> io::Result<()>;

    async fn exists(&self, path: &Path) -> bool;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// In-memory file store
    #[derive(Default)]
    pub struct InMemoryFileStore {
        files: Mutex<HashMap<PathBuf, String>>,
        reads: Mutex<Vec<PathBuf>>,
    }

    impl InMemoryFileStore {
        pub fn new() -> Self {
            Self::default()
        }
        pub fn insert(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
            self.files
                .lock()
                .unwrap()
                .insert(path.into(), content.into());
        }
        pub fn get(&self, path: &Path) -> Option<String> {
            self.files.lock().unwrap().get(path).cloned()
        }
        pub fn len(&self) -> usize {
            self.files.lock().unwrap().len()
        }
        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
        /// Paths passed to `read`, in order
        pub fn reads(&self) -> Vec<PathBuf> {
            self.reads.lock().unwrap().clone()
        }
    }

    fn not_found(path: &Path) -> io::Error {
        io::Error::new(io::ErrorKind::NotFound, path.display().to_string())
    }

    #[async_trait]
    impl FileStore for InMemoryFileStore {
        async fn write(&self, path: &Path, content: &str) -> io::Result<()> {
            self.insert(path, content);
            Ok(())
        }
        async fn read(&self, path: &Path) -> io::Result<String> {
            self.reads.lock().unwrap().push(path.to_path_buf());
            self.get(path).ok_or_else(|| not_found(path))
        }
        async fn remove(&self, path: &Path) -> io::Result<()> {
            self.files
                .lock()
                .unwrap()
                .remove(path)
                .map(|_| ())
                .ok_or_else(|| not_found(path))
        }
        async fn exists(&self, path: &Path) -> bool {
            self.files.lock().unwrap().contains_key(path)
        }
    }
}
