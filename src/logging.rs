//! Tracing setup for the command-line tool

use std::sync::Once;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: Once = Once::new();

/// Log level for a `-v` count: warn by default, info for `-v`, debug above
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    }
}

/// Install the global subscriber, writing to stderr. `RUST_LOG` wins when
/// set; otherwise only this crate logs, at the level chosen by `verbosity`.
/// Later calls are no-ops.
pub fn init_tracing(verbosity: u8) {
    TRACING_INIT.call_once(|| {
        let filter = match std::env::var("RUST_LOG") {
            Ok(_) => EnvFilter::from_default_env(),
            Err(_) => EnvFilter::new(format!("envelope_grid={}", level_for(verbosity))),
        };

        // A subscriber installed elsewhere (e.g. by a test harness) is kept
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
