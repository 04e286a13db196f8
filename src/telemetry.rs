use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Logs share the terminal with the chat, so only errors get through unless
/// asked for.
fn default_directive(verbose: bool) -> &'static str {
    if verbose { "shopchat=debug" } else { "error" }
}

fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Installs the stderr subscriber. `RUST_LOG` wins; otherwise `verbose`
/// picks debug over errors only.
pub fn init(verbose: bool) {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter(verbose))
        .with(fmt_layer)
        .try_init();
}
