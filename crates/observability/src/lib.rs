//! Tracing and logging (shared setup).

pub use tracing::LogFormat;

/// Initialize process-wide logging with JSON output.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(LogFormat::Json);
}

/// Initialize process-wide logging with the given output format.
pub fn init_with(format: LogFormat) {
    tracing::init(format);
}

/// Tracing configuration (filters, layers).
pub mod tracing;
