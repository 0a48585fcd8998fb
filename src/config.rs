//! Pool configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment
//! variables (or a `.env` file via `dotenvy`), with sensible defaults
//! when a variable is unset.

use std::time::Duration;

/// Default consumer readiness window in milliseconds.
const DEFAULT_CONSUMER_READY_TIMEOUT_MS: u64 = 500;

/// Default capacity of the event bus broadcast channel.
const DEFAULT_EVENT_BUS_CAPACITY: usize = 10_000;

/// Top-level pool configuration.
///
/// Loaded once via [`PoolConfig::from_env`], or built with
/// [`PoolConfig::default`] for embedded use.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// How long consumer creation waits for an early error before
    /// optimistically treating the handle as connected.
    pub consumer_ready_timeout: Duration,

    /// Capacity of the `EventBus` broadcast channel.
    pub event_bus_capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            consumer_ready_timeout: Duration::from_millis(DEFAULT_CONSUMER_READY_TIMEOUT_MS),
            event_bus_capacity: DEFAULT_EVENT_BUS_CAPACITY,
        }
    }
}

impl PoolConfig {
    /// Loads configuration from environment variables.
    ///
    /// Recognized keys: `CONSUMER_READY_TIMEOUT_MS` (default 500),
    /// `EVENT_BUS_CAPACITY` (default 10 000). Falls back to defaults on
    /// missing or unparseable values. Calls `dotenvy::dotenv().ok()` to
    /// optionally load a `.env` file.
    #[must_use]
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let timeout_ms = parse_env(
            "CONSUMER_READY_TIMEOUT_MS",
            DEFAULT_CONSUMER_READY_TIMEOUT_MS,
        );
        let event_bus_capacity = parse_env("EVENT_BUS_CAPACITY", DEFAULT_EVENT_BUS_CAPACITY);

        Self {
            consumer_ready_timeout: Duration::from_millis(timeout_ms),
            event_bus_capacity,
        }
    }
}

/// Parses an environment variable as `T`, returning `default` on
/// missing or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
