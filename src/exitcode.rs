//! Standard exit codes (BSD sysexits.h compatible)

/// Successful termination
pub const OK: i32 = 0;

/// Data format error (unexpected response body)
pub const DATAERR: i32 = 65;

/// Service unavailable (transport failure or error status)
pub const UNAVAILABLE: i32 = 69;

/// Internal software error
pub const SOFTWARE: i32 = 70;

/// Permission denied (401/403 from the API)
pub const NOPERM: i32 = 77;

/// Configuration error
pub const CONFIG: i32 = 78;
