use crate::core::config::LoggingConfig;
use std::io::IsTerminal;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Human-readable output when asked for explicitly or by format
fn wants_console(config: &LoggingConfig) -> bool {
    config.console || config.format == "console"
}

/// Install the global subscriber. `RUST_LOG` takes precedence over the
/// configured level.
pub fn init_tracing(config: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(env_filter);

    if wants_console(config) {
        // colours only when someone is watching; redirected logs stay plain
        let ansi = std::io::stdout().is_terminal();
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(ansi)
                    .compact()
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true)
                    .with_span_list(false)
            )
            .init();
    }

    tracing::debug!(
        level = %config.level,
        format = %config.format,
        "Logging initialized"
    );
}
