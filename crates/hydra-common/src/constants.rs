//! Shared constants for Hydra components.

/// Default HTTP listen port, shared by every worker via SO_REUSEPORT
pub const DEFAULT_PORT: u16 = 3000;

/// Default HTTP listen host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Lower bound on the worker count, applied when CPU detection
/// reports zero cores or the configured count is zero
pub const MIN_WORKERS: usize = 1;

/// Listen backlog passed to the worker socket
pub const LISTEN_BACKLOG: u32 = 1024;
