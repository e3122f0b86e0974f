//! hyhdl bridge - command-line host
//! Runs the instantiation, testbench, documentation and formatting tools
//! on a single HDL source file.

mod settings;
mod terminal_host;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hyhdl_core::application::{
    cancel_channel, BridgeSettings, CancelToken, CommandService, ExternalToolBridge,
};
use hyhdl_core::domain::{Delivery, Document, HdlCommand};
use hyhdl_core::port::id_provider::UuidProvider;
use hyhdl_core::port::time_provider::SystemTimeProvider;
use hyhdl_infra_system::{LocalFileStore, SubprocessToolRunner};

use terminal_host::{OutputTarget, TerminalHost};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "hyhdl-bridge")]
#[command(
    about = "Instantiation, testbench, documentation and formatting for Verilog",
    long_about = None
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings file (TOML, JSON or YAML)
    #[arg(long, env = "HYHDL_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Write the result to this file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the instantiation snippet of the module
    Instantiate {
        /// Verilog / SystemVerilog source file
        file: PathBuf,
    },

    /// Generate a testbench for the module
    Testbench {
        file: PathBuf,

        /// Testbench template (overrides the configured one)
        #[arg(short = 'T', long)]
        template: Option<PathBuf>,
    },

    /// Render the documentation preview HTML
    Preview { file: PathBuf },

    /// Export documentation as HTML next to the source file
    Export { file: PathBuf },

    /// Format the source file
    Format {
        file: PathBuf,

        /// Rewrite the file instead of printing the result
        #[arg(long)]
        write: bool,
    },
}

impl Commands {
    fn file(&self) -> &Path {
        match self {
            Commands::Instantiate { file }
            | Commands::Testbench { file, .. }
            | Commands::Preview { file }
            | Commands::Export { file }
            | Commands::Format { file, .. } => file,
        }
    }
}

fn init_logging() {
    let log_format = std::env::var("HYHDL_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("hyhdl=warn"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // stdout carries results, logs go to stderr
    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

/// Cancel in-flight tool invocations on Ctrl+C
fn cancel_on_ctrl_c() -> CancelToken {
    let (handle, token) = cancel_channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, cancelling tool invocation");
            handle.cancel();
        }
    });
    token
}

async fn read_document(path: &Path) -> Result<Document> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(Document::from_path(path, text))
}

fn wire(settings: BridgeSettings, host: TerminalHost) -> CommandService {
    let time_provider = Arc::new(SystemTimeProvider);
    let runner = Arc::new(SubprocessToolRunner::new(
        time_provider,
        settings.env_allowlist.clone(),
    ));

    let bridge = ExternalToolBridge::new(
        Arc::new(settings),
        runner,
        Arc::new(LocalFileStore::new()),
        Arc::new(host),
        Arc::new(UuidProvider),
    );
    CommandService::new(Arc::new(bridge))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    info!("hyhdl bridge v{} starting...", VERSION);

    let mut settings = settings::load_settings(cli.config.as_deref())?;
    if let Commands::Testbench {
        template: Some(template),
        ..
    } = &cli.command
    {
        settings.testbench_template_file_path = template.to_string_lossy().into_owned();
    }

    let document = read_document(cli.command.file()).await?;
    let output = cli
        .output
        .clone()
        .map(OutputTarget::File)
        .unwrap_or(OutputTarget::Stdout);
    let write_in_place = matches!(cli.command, Commands::Format { write: true, .. });

    let host = TerminalHost::new(document.clone(), output).write_in_place(write_in_place);
    let commands = wire(settings, host);
    let cancel = cancel_on_ctrl_c();

    let delivery = match cli.command {
        Commands::Instantiate { .. } => {
            commands
                .execute(HdlCommand::InstantiateModule, cancel)
                .await?
        }
        Commands::Testbench { .. } => {
            commands
                .execute(HdlCommand::GenerateTestbench, cancel)
                .await?
        }
        Commands::Preview { .. } => {
            commands
                .execute(HdlCommand::ShowDocumentationPreview, cancel)
                .await?
        }
        Commands::Export { .. } => {
            commands
                .execute(HdlCommand::ExportDocumentationAsHtml, cancel)
                .await?
        }
        Commands::Format { .. } => {
            if !commands.formatter().is_enabled() {
                anyhow::bail!("Formatter is disabled (enable_formatter = false)");
            }
            let edits = commands.formatter().format(&document, cancel).await?;
            Some(Delivery::Edits(edits))
        }
    };

    if let Some(delivery) = delivery {
        tracing::debug!(delivery = ?delivery, "Command completed");
    }

    Ok(())
}
