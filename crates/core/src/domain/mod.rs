// Domain Layer - Pure types describing documents, invocations and results

pub mod command;
pub mod document;
pub mod error;
pub mod invocation;
pub mod message;
pub mod mode;
pub mod result;
pub mod snapshot;
pub mod text_edit;

// Re-exports
pub use command::HdlCommand;
pub use document::{export_path_for, language_for_path, Document, DocumentId};
pub use error::DomainError;
pub use invocation::{Platform, ToolCommand, ToolExecutable, ToolInvocation};
pub use message::{PreviewRequest, WebviewMessage};
pub use mode::{OutputConvention, ToolKind, ToolMode};
pub use result::{Delivery, ToolResult};
pub use snapshot::{SnapshotStrategy, SourceSnapshot};
pub use text_edit::{Position, TextEdit, TextRange};
