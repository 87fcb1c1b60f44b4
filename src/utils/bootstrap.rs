//! Bootstrap utilities for the supersession binary.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LOG_ENV_VAR;
use crate::supersede::NoticeConfig;

/// Default log level for the given output settings.
///
/// Verbose wins over silent; silent keeps warnings and errors.
pub fn default_log_level(notices: NoticeConfig) -> &'static str {
    if notices.verbose {
        "debug"
    } else if notices.silent {
        "warn"
    } else {
        "info"
    }
}

/// Initialize tracing with ESGF_SUPERSEDE_LOG environment variable.
///
/// Falls back to [`default_log_level`] when the variable is not set.
/// Output goes to stderr.
pub fn init_tracing(notices: NoticeConfig) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV_VAR)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_log_level(notices))),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
