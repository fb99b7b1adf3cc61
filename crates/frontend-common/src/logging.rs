//! Tracing subscriber setup
//!
//! `RUST_LOG` takes precedence over the configured level where the process
//! has an environment. In the browser, events go to the developer console.

use trabuddy_core::LoggingConfig;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber
///
/// Returns `false` when a subscriber was already installed.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging(config: &LoggingConfig) -> bool {
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter(config))
        .try_init()
        .is_ok()
}

/// Install the global subscriber
///
/// Returns `false` when a subscriber was already installed.
#[cfg(target_arch = "wasm32")]
pub fn init_logging(config: &LoggingConfig) -> bool {
    use tracing_web::MakeWebConsoleWriter;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_writer(MakeWebConsoleWriter::new());

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter(config))
        .try_init()
        .is_ok()
}
