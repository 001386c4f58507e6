use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("ledger_core=info".parse().unwrap());

        fmt().with_env_filter(filter).init();
    });
}

/// Rounds to two decimals, half away from zero. Monetary values round at the
/// point of computation, not at display time.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Tolerance under which a debit/credit mismatch is treated as float noise.
pub const BALANCE_EPSILON: f64 = 0.01;
