use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// One-time tracing setup. `RUST_LOG` wins over the configured level so a
/// single run can be turned verbose without touching the config.
pub fn init_logging(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().compact())
        .init();

    tracing::debug!("logging initialized at level {log_level}");
}
