// Tool Mode - closed set of external-tool behaviors

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::error::DomainError;

/// Which external executable serves a mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    /// Instantiation, testbench and documentation generator
    Hyhdl,
    /// Source formatter
    Formatter,
}

impl ToolKind {
    /// File name of the executable without extension
    pub fn base_name(&self) -> &'static str {
        match self {
            ToolKind::Hyhdl => "hyhdl",
            ToolKind::Formatter => "verilogFormatter",
        }
    }
}

/// Where a successful invocation leaves its result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputConvention {
    /// stdout carries a single-line path to the result file
    ReportedPath,
    /// The tool rewrites its input file
    InPlace,
}

/// Mode flag passed to the external tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolMode {
    Instantiate,
    Testbench,
    Preview,
    Export,
    Format,
}

impl ToolMode {
    pub const ALL: [ToolMode; 5] = [
        ToolMode::Instantiate,
        ToolMode::Testbench,
        ToolMode::Preview,
        ToolMode::Export,
        ToolMode::Format,
    ];

    /// Command-line switch understood by the tool
    ///
    /// Export uses `-e`: the generator's argument parser reserves `-h` for help.
    pub fn flag(&self) -> &'static str {
        match self {
            ToolMode::Instantiate => "-i",
            ToolMode::Testbench => "-t",
            ToolMode::Preview => "-p",
            ToolMode::Export => "-e",
            ToolMode::Format => "-i",
        }
    }

    pub fn tool_kind(&self) -> ToolKind {
        match self {
            ToolMode::Format => ToolKind::Formatter,
            _ => ToolKind::Hyhdl,
        }
    }

    pub fn output_convention(&self) -> OutputConvention {
        match self {
            ToolMode::Format => OutputConvention::InPlace,
            _ => OutputConvention::ReportedPath,
        }
    }

    /// Only testbench generation accepts a `-T <template>` argument
    pub fn accepts_template(&self) -> bool {
        matches!(self, ToolMode::Testbench)
    }
}

impl std::fmt::Display for ToolMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolMode::Instantiate => write!(f, "instantiate"),
            ToolMode::Testbench => write!(f, "testbench"),
            ToolMode::Preview => write!(f, "preview"),
            ToolMode::Export => write!(f, "export"),
            ToolMode::Format => write!(f, "format"),
        }
    }
}

impl FromStr for ToolMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolMode::ALL
            .into_iter()
            .find(|mode| mode.to_string() == s)
            .ok_or_else(|| DomainError::UnknownMode(s.to_string()))
    }
}
