// Log setup. The terminal belongs to the UI, so logs go to a file through
// a non-blocking appender; the returned guard must live until exit so
// buffered lines are flushed.

use std::fs;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

pub const LOG_FILE: &str = "fileshare-cli.log";

/// Install the global subscriber. Returns `None` (and logs nothing) when
/// no log directory is configured or it cannot be created.
pub fn init(config: &Config) -> Option<WorkerGuard> {
    let dir = config.log_dir.as_ref()?;
    if let Err(e) = fs::create_dir_all(dir) {
        eprintln!("logging disabled: cannot create {}: {e}", dir.display());
        return None;
    }

    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hyper=warn,reqwest=warn"));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init();
    if installed.is_err() {
        return None;
    }
    Some(guard)
}
