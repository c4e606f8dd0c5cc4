use anyhow::{Context, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

/// Installs the global subscriber. Quiet unless `verbose`; `RUST_LOG` narrows further.
///
/// Output goes to stderr, stdout is reserved for tables and the chat.
pub fn init_logging(verbose: bool) -> Result<()> {
    let (level_filter, level) = if verbose {
        (LevelFilter::DEBUG, "debug")
    } else {
        (LevelFilter::OFF, "off")
    };
    // The storage engine is chatty at debug level
    let storage_filter = level_filter.min(LevelFilter::INFO);
    let app_filter = Targets::new()
        .with_target("finledger", level_filter)
        .with_target("fjall", storage_filter)
        .with_target("lsm_tree", storage_filter);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .pretty()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(app_filter)
        .with(env_filter)
        .try_init()
        .context("Failed to initialize logging")
}
