// Application Layer - Use Cases

pub mod bridge;
pub mod cancel;
pub mod code_template;
pub mod commands;
pub mod constants;
pub mod documentation;
pub mod formatter;
pub mod settings;

// Re-exports
pub use bridge::{ExternalToolBridge, InvocationOptions};
pub use cancel::{cancel_channel, CancelHandle, CancelToken};
pub use code_template::CodeTemplateService;
pub use commands::CommandService;
pub use documentation::DocumentationService;
pub use formatter::FormatterService;
pub use settings::{BridgeSettings, ToolOverride};
