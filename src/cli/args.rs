//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `build`: Extract the component tree and write the JSON document
//! - `init`: Initialize comptree configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Build(cmd)) => cmd.args.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Directory to discover component files under (overrides config file)
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Parser)]
pub struct BuildArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Application name used in the output file name (overrides config file)
    #[arg(long)]
    pub app: Option<String>,

    /// Directory the JSON document is written to (overrides config file)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Print the JSON document to stdout instead of writing a file
    #[arg(long)]
    pub stdout: bool,

    /// Leave out top-level components that have no children
    #[arg(long)]
    pub prune_leaves: bool,
}

#[derive(Debug, Args)]
pub struct BuildCommand {
    #[command(flatten)]
    pub args: BuildArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract the component dependency tree and write it as JSON
    Build(BuildCommand),
    /// Initialize a new .comptreerc.json configuration file
    Init,
}
