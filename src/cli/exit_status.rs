use std::process::ExitCode;

/// Exit status for CLI commands.
///
/// - `Success` (0): Command completed, no errors reported
/// - `Failure` (1): Command completed but reported errors (output is still written)
/// - `Error` (2): Command failed (config error, unreadable source root, write failure)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// Command completed, no errors reported.
    Success,
    /// Command completed but reported errors.
    Failure,
    /// Command failed before producing output.
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_code_values() {
        assert_eq!(ExitCode::from(ExitStatus::Success), ExitCode::from(0));
        assert_eq!(ExitCode::from(ExitStatus::Failure), ExitCode::from(1));
        assert_eq!(ExitCode::from(ExitStatus::Error), ExitCode::from(2));
    }
}
