use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command line arguments for the research CLI
#[derive(Parser, Debug)]
#[clap(
    name = "rmt",
    about = "Ask several research engines one question and get a synthesized report",
    args_conflicts_with_subcommands = true
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// The research question. Read from stdin when omitted and stdin is piped.
    #[arg()]
    pub question: Option<String>,

    /// Path to research config file (defaults to ~/.rmt/research.toml or .json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print the full response as JSON instead of the rendered report
    #[arg(long)]
    pub json: bool,

    /// Append the raw per-engine excerpts to the rendered report
    #[arg(long)]
    pub raw: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List engines and whether their credential is configured
    Engines,
    /// Print the prompt that would be sent to every engine
    Prompt { question: String },
}
