use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_DIRECTIVES: &str = "info,social_server=debug,sqlx=warn";

/// Installs the global subscriber. `RUST_LOG` overrides the default directives,
/// `NO_COLOR` turns off ANSI escapes (useful when logs go to a file or a collector).
pub fn init_logging() {
    let ansi = std::env::var_os("NO_COLOR").is_none();

    let fmt_layer = fmt::layer()
        .with_ansi(ansi)
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt_layer)
        .init();

    tracing::info!("Logging initialized");
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}
