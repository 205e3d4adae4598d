//! tracing setup for the binary

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber
///
/// `log_level` is an `EnvFilter` directive ("debug", "minesight=trace", ...);
/// a bad directive falls back to `info`. Output goes to stderr so stdout
/// carries only render lines. Calling this twice is a no-op.
pub fn init_tracing(log_level: &str) {
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .try_init();
}
