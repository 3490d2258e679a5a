//! `tracing` subscriber setup.
//!
//! Log lines go to stderr so stdout stays free for the run summary. The
//! level comes from `-v`/`-q`; `RUST_LOG`, when set, wins.

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Map the CLI verbosity flags onto a level for this crate's targets.
///
/// Quiet keeps errors only; each `-v` steps one level down from `warn`.
pub fn level_for(verbosity: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the global subscriber. Later calls are ignored.
pub fn init_logging(level: Level) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("ugen_stubgen={level}")));

        let installed = tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(level >= Level::DEBUG),
            )
            .try_init();

        if let Err(e) = installed {
            eprintln!("logging already initialized: {e}");
        }
    });
}
