use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter};

pub const LOG_FILTER_VAR: &str = "ROUTE_LEDGER_LOG";

/// Installs the global subscriber. Filter directives come from
/// `ROUTE_LEDGER_LOG` and default to `info`. Calling it twice is harmless.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_FILTER_VAR).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
