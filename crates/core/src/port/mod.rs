// Port Layer - Interfaces for external dependencies

pub mod editor_host;
pub mod file_store;
pub mod id_provider; // For deterministic testing
pub mod time_provider;
pub mod tool_runner;

// Re-exports
pub use editor_host::{EditorHost, PreviewPanelOptions};
pub use file_store::FileStore;
pub use id_provider::IdProvider;
pub use time_provider::TimeProvider;
pub use tool_runner::{ExecutionError, ExecutionStatus, ToolOutput, ToolRunner};
