//! Tracing and logging (shared setup).

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use crate::tracing::LogFormat;

/// Initialize process-wide tracing/logging.
///
/// `default_format` is used unless `STOCKLEDGER_LOG_FORMAT` overrides it.
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init(default_format: LogFormat) {
    let format = LogFormat::from_env(default_format);
    crate::tracing::init(format);
}
