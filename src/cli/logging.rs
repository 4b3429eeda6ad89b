use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `COMPTREE_LOG=comptree=trace`.
pub const LOG_ENV: &str = "COMPTREE_LOG";

/// Install the global stderr subscriber.
///
/// `COMPTREE_LOG` wins when set; otherwise `-v` selects `debug` and the
/// default is `warn`. Calling this more than once is harmless.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "comptree=debug" } else { "warn" })
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .try_init();
}
