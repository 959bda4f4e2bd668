use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset. Verbose mode lifts this crate to debug
/// and leaves dependencies at the configured level.
fn default_directives(level: &str, verbose: bool) -> String {
    if verbose {
        format!("rig_builder=debug,{}", level)
    } else {
        format!("rig_builder={}", level)
    }
}

fn env_filter(level: &str, verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level, verbose)))
}

pub fn init_cli_logger(level: &str, verbose: bool) {
    let _ = tracing_subscriber::registry()
        .with(env_filter(level, verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init();
}

/// Structured output for deployments that ship logs to a collector.
pub fn init_json_logger(level: &str, verbose: bool) {
    let _ = tracing_subscriber::registry()
        .with(env_filter(level, verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .json()
                .with_current_span(false),
        )
        .try_init();
}
