// Commands exposed to the editor host (closed set)

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HdlCommand {
    InstantiateModule,
    GenerateTestbench,
    ShowDocumentationPreview,
    ExportDocumentationAsHtml,
}

impl HdlCommand {
    pub const ALL: [HdlCommand; 4] = [
        HdlCommand::InstantiateModule,
        HdlCommand::GenerateTestbench,
        HdlCommand::ShowDocumentationPreview,
        HdlCommand::ExportDocumentationAsHtml,
    ];

    /// Identifier registered with the host's command palette
    pub fn id(&self) -> &'static str {
        match self {
            HdlCommand::InstantiateModule => "hyhdl.instantiation",
            HdlCommand::GenerateTestbench => "hyhdl.testbench",
            HdlCommand::ShowDocumentationPreview => "hyhdl.documentation",
            HdlCommand::ExportDocumentationAsHtml => "hyhdl.exportDocumentation",
        }
    }
}

impl std::fmt::Display for HdlCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for HdlCommand {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HdlCommand::ALL
            .into_iter()
            .find(|cmd| cmd.id() == s)
            .ok_or_else(|| DomainError::UnknownCommand(s.to_string()))
    }
}
