//! Logger initialization.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// The default level applies to the given binary's target only; everything
/// else defaults to `info`. `RUST_LOG` overrides both.
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "info,{}={level},atelier_server={level},atelier_client={level}",
            bin_name.replace('-', "_"),
            level = default_level
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
