//! Logging infrastructure for Quarry.
//!
//! Structured logging controlled by the `QUARRY_DEBUG` environment
//! variable.
//!
//! # Environment Variables
//!
//! - `QUARRY_DEBUG=true` - Enable debug logging
//! - `QUARRY_LOG_LEVEL=trace|debug|info|warn|error` - Set a specific level
//! - `QUARRY_LOG_FORMAT=json|pretty|compact` - Set output format (default: json)
//!
//! # Usage
//!
//! ```rust,no_run
//! use quarry_query::logging;
//!
//! // Initialize logging (call once at startup)
//! logging::init();
//! ```
//!
//! Within the crate, the standard tracing macros are used:
//!
//! ```rust,ignore
//! use tracing::debug;
//!
//! debug!(connector = ?settings.connector, "settings parsed");
//! ```

use std::env;
use std::sync::Once;

static INIT: Once = Once::new();

/// Check if debug logging is enabled via `QUARRY_DEBUG`.
///
/// Returns `true` if `QUARRY_DEBUG` is set to "true", "1", or "yes"
/// (case-insensitive).
#[inline]
pub fn is_debug_enabled() -> bool {
    env::var("QUARRY_DEBUG")
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// Get the configured log level from `QUARRY_LOG_LEVEL`.
///
/// Defaults to "debug" if `QUARRY_DEBUG` is enabled, otherwise "warn".
pub fn get_log_level() -> &'static str {
    match env::var("QUARRY_LOG_LEVEL") {
        Ok(level) => match level.to_lowercase().as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "info" => "info",
            "warn" => "warn",
            "error" => "error",
            _ => default_level(),
        },
        Err(_) => default_level(),
    }
}

fn default_level() -> &'static str {
    if is_debug_enabled() { "debug" } else { "warn" }
}

/// Get the configured log format from `QUARRY_LOG_FORMAT`.
///
/// Defaults to "json" for structured logging.
pub fn get_log_format() -> &'static str {
    env::var("QUARRY_LOG_FORMAT")
        .map(|format| match format.to_lowercase().as_str() {
            "pretty" => "pretty",
            "compact" => "compact",
            _ => "json",
        })
        .unwrap_or("json")
}

/// Initialize the Quarry logging system.
///
/// Call once at application startup; subsequent calls are no-ops. With
/// neither `QUARRY_DEBUG` nor `QUARRY_LOG_LEVEL` set, nothing is
/// installed and the host application's subscriber stays in charge.
pub fn init() {
    INIT.call_once(|| {
        if !is_debug_enabled() && env::var("QUARRY_LOG_LEVEL").is_err() {
            return;
        }

        #[cfg(feature = "tracing-subscriber")]
        {
            use tracing_subscriber::{EnvFilter, fmt, prelude::*};

            let level = get_log_level();
            let filter = EnvFilter::try_new(format!("quarry={level},quarry_query={level}"))
                .unwrap_or_else(|_| EnvFilter::new("warn"));

            match get_log_format() {
                "compact" => {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().compact())
                        .init();
                }
                "pretty" => {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().pretty())
                        .init();
                }
                _ => {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().json())
                        .init();
                }
            }

            tracing::info!(
                level = level,
                format = get_log_format(),
                "Quarry logging initialized"
            );
        }

        #[cfg(not(feature = "tracing-subscriber"))]
        {
            // Without the subscriber feature the host application is
            // expected to install its own.
        }
    });
}

/// Initialize logging for debugging (convenience function).
///
/// Equivalent to setting `QUARRY_DEBUG=true` and calling [`init`].
///
/// # Safety
///
/// Modifies environment variables, which is unsafe in multi-threaded
/// programs. Call early, before spawning threads.
pub fn init_debug() {
    // SAFETY: intended for program startup before threads are spawned;
    // the caller is responsible for sequencing this correctly.
    unsafe {
        env::set_var("QUARRY_DEBUG", "true");
    }
    init();
}

/// Macro for conditional debug logging.
///
/// Only logs if `QUARRY_DEBUG` is enabled at runtime.
#[macro_export]
macro_rules! quarry_debug {
    ($($arg:tt)*) => {
        if $crate::logging::is_debug_enabled() {
            tracing::debug!($($arg)*);
        }
    };
}
