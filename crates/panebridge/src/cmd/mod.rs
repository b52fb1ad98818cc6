use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};

use panebridge_protocol::ScriptedCompletion;
use panebridge_wire::ModelDescriptor;

use crate::exit::{io_error, json_error, CliError, CliResult, INTERNAL};
use crate::output::OutputFormat;

pub mod chat;
pub mod models;
pub mod replay;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a file of inbound envelopes through the protocol.
    Replay(ReplayArgs),
    /// Send a single chat prompt and print the streamed replies.
    Chat(ChatArgs),
    /// Print the model roster served to the panel.
    Models(ModelsArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Replay(args) => replay::run(args, format),
        Command::Chat(args) => chat::run(args, format),
        Command::Models(args) => models::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// File of inbound messages, one JSON envelope per line.
    pub path: PathBuf,
    /// Model roster file (JSON array of {title, provider, model}).
    #[arg(long, value_name = "FILE")]
    pub models: Option<PathBuf>,
    #[command(flatten)]
    pub script: ScriptArgs,
}

#[derive(Args, Debug)]
pub struct ChatArgs {
    /// The user prompt.
    pub prompt: String,
    /// Model title to request.
    #[arg(long)]
    pub model: Option<String>,
    #[command(flatten)]
    pub script: ScriptArgs,
}

#[derive(Args, Debug)]
pub struct ModelsArgs {
    /// Model roster file (JSON array of {title, provider, model}).
    #[arg(long, value_name = "FILE")]
    pub models: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Scripted completion behavior shared by `replay` and `chat`.
#[derive(Args, Debug, Default)]
pub struct ScriptArgs {
    /// Chunk to stream for chat requests (repeatable, in order).
    #[arg(long = "chunk", value_name = "TEXT")]
    pub chunks: Vec<String>,
    /// Report the requested model as unsupported.
    #[arg(long, conflicts_with_all = ["chunks", "error", "fail_after"])]
    pub unavailable: bool,
    /// Fail the completion call before any chunk is produced.
    #[arg(long, value_name = "MESSAGE", conflicts_with_all = ["chunks", "fail_after"])]
    pub error: Option<String>,
    /// Fail mid-stream with this message after the scripted chunks.
    #[arg(long, value_name = "MESSAGE")]
    pub fail_after: Option<String>,
}

impl ScriptArgs {
    pub fn completion(&self) -> ScriptedCompletion {
        if self.unavailable {
            return ScriptedCompletion::unavailable();
        }
        if let Some(message) = &self.error {
            return ScriptedCompletion::call_error(message.clone());
        }
        if let Some(message) = &self.fail_after {
            return ScriptedCompletion::failing_after(self.chunks.clone(), message.clone());
        }
        ScriptedCompletion::chunks(self.chunks.clone())
    }
}

pub fn load_models(path: Option<&Path>) -> CliResult<Vec<ModelDescriptor>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let raw = fs::read_to_string(path)
        .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?;
    serde_json::from_str(&raw)
        .map_err(|err| json_error(&format!("invalid model roster {}", path.display()), err))
}

pub fn runtime() -> CliResult<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .map_err(|err| CliError::new(INTERNAL, format!("failed starting runtime: {err}")))
}
