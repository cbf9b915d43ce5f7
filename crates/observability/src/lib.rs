//! Tracing setup shared by the reporting binaries.

/// Initialize process-wide structured logging with the defaults: JSON lines on
/// stderr, filtered by `RUST_LOG` (default `info`).
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(LogFormat::Json);
}

/// Subscriber configuration (filters, formats, writer).
pub mod tracing;

pub use tracing::LogFormat;
