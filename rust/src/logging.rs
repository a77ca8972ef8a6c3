//! Logging macros for the allocator with verbosity level control.
//!
//! Messages go through the `log` facade; the verbosity carried in
//! `AllocationConfig` decides which of them are emitted at all.
//! - 0: SILENT (only errors)
//! - 1: CHANGES (core assignments)
//! - 2: CHECKS (per-job availability details)
//! - 3: DEBUG (per-step free sets)

use log::LevelFilter;

/// Verbosity level constants.
pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_CHANGES: u8 = 1;
pub const VERBOSITY_CHECKS: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

/// Log at CHANGES level (verbosity >= 1).
///
/// Used for: core assignments, reservations.
#[macro_export]
macro_rules! log_changes {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHANGES {
            log::info!($($arg)*);
        }
    };
}

/// Log at CHECKS level (verbosity >= 2).
///
/// Used for: job consideration, available core counts.
#[macro_export]
macro_rules! log_checks {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHECKS {
            log::debug!($($arg)*);
        }
    };
}

/// Log at DEBUG level (verbosity >= 3).
///
/// Used for: detailed algorithm internals, step-by-step intersections.
#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_DEBUG {
            log::trace!($($arg)*);
        }
    };
}

/// Map a verbosity level to the `log` filter that lets its messages through.
pub fn level_filter(verbosity: u8) -> LevelFilter {
    match verbosity {
        VERBOSITY_SILENT => LevelFilter::Warn,
        VERBOSITY_CHANGES => LevelFilter::Info,
        VERBOSITY_CHECKS => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Initialize `env_logger` for the command line tool.
///
/// `RUST_LOG` takes precedence over the verbosity when it is set.
pub fn setup_logging(verbosity: u8) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level_filter(verbosity));
    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }
    builder.format_timestamp_millis().init();
}
