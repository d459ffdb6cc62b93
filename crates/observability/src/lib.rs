//! Tracing/logging setup shared by the client binary and its tests.

/// Initialize process-wide logging.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(tracing::LogFormat::from_env());
}

/// Subscriber configuration (filters, output format).
pub mod tracing;
