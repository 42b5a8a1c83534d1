use tracing_subscriber::EnvFilter;

// Without RUST_LOG, only this crate logs at info; dependencies stay at warn.
const DEFAULT_FILTER: &str = "warn,api_client=info";

/// Install the global subscriber. `LOG_FORMAT=json` switches to JSON lines
/// carrying the active span, e.g. `session_bootstrap`.
pub fn init_tracing() {
    let filter = default_filter(std::env::var("RUST_LOG").ok().as_deref());

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

fn default_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}
