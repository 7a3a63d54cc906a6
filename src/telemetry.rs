//! Opt-in `tracing` setup for hosts embedding the canvas engine.
//!
//! The engine only emits events. Hosts that already run a subscriber need
//! nothing from here.

/// Filter used when `RUST_LOG` is unset: engine chatter at `debug`, the rest at `warn`.
pub const DEFAULT_FILTER: &str = "pixelaw_canvas=debug,warn";

/// Installs a compact global subscriber filtered by `RUST_LOG`, falling back
/// to [`DEFAULT_FILTER`].
///
/// Returns `false` when the `telemetry` feature is off or a global subscriber
/// is already installed.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER));
        return install(filter);
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}

/// Installs a compact global subscriber with explicit filter directives,
/// e.g. `"pixelaw_canvas::cache=trace"`.
///
/// Invalid directives are rejected without touching global state.
#[must_use]
pub fn init_tracing_with_filter(directives: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        return match tracing_subscriber::EnvFilter::try_new(directives) {
            Ok(filter) => install(filter),
            Err(_) => false,
        };
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = directives;
        false
    }
}

#[cfg(feature = "telemetry")]
fn install(filter: tracing_subscriber::EnvFilter) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .try_init()
        .is_ok()
}
