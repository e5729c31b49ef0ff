//! Tracing setup for applications hosting a board.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "glasslog_board=info,glasslog_core=info";

/// Install a global `fmt` subscriber filtered by `RUST_LOG`, or by
/// `default_filter` when the variable is unset.
///
/// Returns `false` if a global subscriber was already installed, which makes
/// it safe to call from every test.
pub fn init(default_filter: &str) -> bool {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}
