use std::path::PathBuf;

use crate::issues::Issue;

#[derive(Debug)]
pub enum CommandSummary {
    Build(BuildSummary),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct BuildSummary {
    pub component_count: usize,
    pub declaration_files: usize,
    pub markup_files: usize,
    /// Where the document was written; `None` when printed to stdout.
    pub output_file: Option<PathBuf>,
}

#[derive(Debug)]
pub struct InitSummary {
    /// Set when the config file could not be created.
    pub error: Option<String>,
}

/// Result of running comptree commands
pub struct CommandResult {
    pub summary: CommandSummary,
    pub error_count: usize,
    pub warning_count: usize,
    /// All issues found during the build.
    /// Empty for non-build commands.
    pub issues: Vec<Issue>,
}
