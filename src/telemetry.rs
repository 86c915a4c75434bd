//! Logging setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "PORTAL_LOG";

/// Installs the global subscriber. Logs go to stderr so command output on
/// stdout stays clean. Safe to call more than once.
///
/// `.env` is loaded first so `PORTAL_LOG` may be set there.
pub fn init() {
    let dotenv_error = crate::config::read_dotenv();
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
    if let Some(err) = dotenv_error {
        tracing::warn!(error = %err, "failed to load .env file");
    }
}
