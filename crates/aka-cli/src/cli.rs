use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "aka",
    about = "aka -- keyed record store with secondary-key aliasing",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Replay a JSON-lines operation script against a fresh store
    Run(RunArgs),
    /// Print the canonical key of a JSON literal
    Canon(CanonArgs),
}

#[derive(Args)]
pub struct RunArgs {
    /// Script file, one JSON operation per line
    pub script: PathBuf,
    /// Bind secondary keys one at a time, keeping bindings made before a conflict
    #[arg(long)]
    pub eager: bool,
}

#[derive(Args)]
pub struct CanonArgs {
    /// Key as a JSON literal; text that is not valid JSON is taken as a string
    pub key: String,
}
