use tracing_subscriber::{
    EnvFilter, fmt, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt,
};

/// A non-empty `RUST_LOG` replaces the verbosity flag entirely.
pub fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    if let Some(filter) = rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
    {
        return filter;
    }

    let level = if verbose { "debug" } else { "info" };
    EnvFilter::new(format!("warn,dca_sim={level}"))
}

pub fn init_logging(verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(log_filter(verbose, rust_log.as_deref()))
        .init();
}
