//! Tracing/logging setup shared by clubhub binaries.

/// Initialize process-wide tracing, filtered by `RUST_LOG` (default `info`).
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Initialize with an explicit filter directive, ignoring `RUST_LOG`.
pub fn init_with_filter(directive: &str) {
    tracing::init_with_filter(directive);
}

/// Subscriber configuration (filters, layers).
pub mod tracing;
