use std::io::{self, Write};

use anyhow::Result;

pub mod args;
pub mod commands;
mod exit_status;
pub mod logging;
mod report;

pub use args::{Arguments, Command};
pub use exit_status::ExitStatus;

use commands::{build::build, init::init};

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let Some(Arguments {
        command: Some(command),
    }) = args.with_command_or_help()
    else {
        return Ok(ExitStatus::Success);
    };

    // The document owns stdout when it is printed there.
    let report_to_stderr = matches!(&command, Command::Build(cmd) if cmd.args.stdout);

    let result = match command {
        Command::Build(cmd) => build(cmd)?,
        Command::Init => init()?,
    };

    if report_to_stderr {
        report::print(&result, &mut io::stderr().lock());
    } else {
        let mut stdout = io::stdout().lock();
        report::print(&result, &mut stdout);
        let _ = stdout.flush();
    }

    if result.error_count > 0 {
        Ok(ExitStatus::Failure)
    } else {
        Ok(ExitStatus::Success)
    }
}
