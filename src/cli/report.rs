//! Report formatting and printing utilities.
//!
//! This module provides functions to display issues in cargo-style format.
//! Separate from core logic to allow comptree to be used as a library.

use std::io::Write;

use colored::Colorize;

use super::commands::{BuildSummary, CommandResult, CommandSummary, InitSummary};
use crate::config::CONFIG_FILE_NAME;
use crate::issues::{Issue, Report, ReportLocation, Severity};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print issues in cargo-style format to a writer.
///
/// Issues are expected to be sorted already (see `helper::finish`).
pub fn report_to<W: Write>(issues: &[Issue], writer: &mut W) {
    if issues.is_empty() {
        return;
    }

    for issue in issues {
        print_issue(issue, writer);
    }

    print_summary(issues, writer);
}

/// Print a success message when no issues are found.
pub fn print_success_to<W: Write>(summary: &BuildSummary, writer: &mut W) {
    let msg = format!(
        "Extracted {} {} from {} declaration {}, {} markup {} - no issues found",
        summary.component_count,
        if summary.component_count == 1 {
            "component"
        } else {
            "components"
        },
        summary.declaration_files,
        if summary.declaration_files == 1 {
            "file"
        } else {
            "files"
        },
        summary.markup_files,
        if summary.markup_files == 1 {
            "file"
        } else {
            "files"
        }
    );
    let _ = writeln!(writer, "{} {}", SUCCESS_MARK.green(), msg.green());
}

// ============================================================
// Internal Functions
// ============================================================

fn print_issue<W: Write>(issue: &Issue, writer: &mut W) {
    let severity_str = match issue.report_severity() {
        Severity::Error => "error".bold().red(),
        Severity::Warning => "warning".bold().yellow(),
    };

    let _ = writeln!(
        writer,
        "{}: {}  {}",
        severity_str,
        issue.message(),
        issue.report_rule().to_string().dimmed().cyan()
    );

    match issue.location() {
        ReportLocation::File { path } => {
            let _ = writeln!(writer, "  {} {}", "-->".blue(), path);
        }
        ReportLocation::Component { name } => {
            let _ = writeln!(writer, "  {} component {}", "-->".blue(), name);
        }
        ReportLocation::Build => {}
    }

    if let Some(details) = issue.details() {
        let _ = writeln!(writer, "  {} {} {}", "=".blue(), "note:".bold(), details);
    }

    if let Some(hint) = issue.hint() {
        let _ = writeln!(writer, "  {} {} {}", "=".blue(), "hint:".bold().cyan(), hint);
    }

    let _ = writeln!(writer); // Empty line between issues
}

fn print_summary<W: Write>(issues: &[Issue], writer: &mut W) {
    let total_errors = issues
        .iter()
        .filter(|i| i.report_severity() == Severity::Error)
        .count();
    let total_warnings = issues.len() - total_errors;

    let _ = writeln!(
        writer,
        "{} {} problems ({} {}, {} {})",
        FAILURE_MARK.red(),
        issues.len(),
        total_errors,
        if total_errors == 1 { "error" } else { "errors" }.red(),
        total_warnings,
        if total_warnings == 1 {
            "warning"
        } else {
            "warnings"
        }
        .yellow()
    );
}

/// Print the outcome of a command.
pub fn print<W: Write>(result: &CommandResult, writer: &mut W) {
    match &result.summary {
        CommandSummary::Build(summary) => print_build(summary, &result.issues, writer),
        CommandSummary::Init(summary) => print_init(summary, writer),
    }
}

fn print_build<W: Write>(summary: &BuildSummary, issues: &[Issue], writer: &mut W) {
    report_to(issues, writer);

    if issues.is_empty() {
        print_success_to(summary, writer);
    }

    if let Some(path) = &summary.output_file {
        let _ = writeln!(writer, "{} {}", "Wrote".green().bold(), path.display());
    }
}

fn print_init<W: Write>(summary: &InitSummary, writer: &mut W) {
    match &summary.error {
        None => {
            let _ = writeln!(
                writer,
                "{} {}",
                SUCCESS_MARK.green(),
                format!("Created {}", CONFIG_FILE_NAME).green()
            );
        }
        Some(error) => {
            let _ = writeln!(writer, "{} {}", "error:".bold().red(), error);
        }
    }
}

// ============================================================
// Tests
// ============================================================
