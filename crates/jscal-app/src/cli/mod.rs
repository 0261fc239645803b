use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::convert::Format;

/// Converts calendar data between JSON and iCalendar.
#[derive(Debug, Parser)]
#[command(name = "jscal", version, about)]
pub struct Cli {
    /// Configuration file; `jscal.toml` in the working directory is used
    /// when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Converts a document from one format to the other.
    Convert(ConvertArgs),
    /// Reads a document and reports what it holds.
    Check(CheckArgs),
}

#[derive(Debug, clap::Args)]
pub struct ConvertArgs {
    /// Input format; guessed from the file extension when omitted.
    #[arg(long, value_enum)]
    pub from: Option<Format>,

    /// Output format; the other format when omitted.
    #[arg(long, value_enum)]
    pub to: Option<Format>,

    /// Always produce a group, even for a single event or task.
    #[arg(long)]
    pub group: bool,

    /// Indent JSON output.
    #[arg(long)]
    pub pretty: bool,

    /// Input file, or `-` for standard input.
    pub input: PathBuf,

    /// Output file; standard output when omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, clap::Args)]
pub struct CheckArgs {
    /// Input format; guessed from the file extension when omitted.
    #[arg(long, value_enum)]
    pub from: Option<Format>,

    /// Input file, or `-` for standard input.
    pub input: PathBuf,
}
