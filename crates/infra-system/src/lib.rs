// hyhdl Infrastructure - System Adapters
// Implements: ToolRunner, FileStore

pub mod file_store_impl;
pub mod subprocess_runner;

pub use file_store_impl::LocalFileStore;
pub use subprocess_runner::SubprocessToolRunner;
