// Diagnostics go to stderr; stdout carries only the answer.

use tracing_subscriber::EnvFilter;

/// Filter directives, e.g. `SALESQ_LOG=salesq_llm=debug`.
pub const LOG_ENV: &str = "SALESQ_LOG";

/// `-v` and `-vv` take precedence over `SALESQ_LOG`; without them the
/// default is `warn`.
pub fn init(verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
