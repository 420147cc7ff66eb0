//! Standard exit codes (BSD sysexits.h compatible)

/// Successful termination
pub const OK: i32 = 0;

/// Command line usage error (e.g. no expression given)
pub const USAGE: i32 = 64;

/// Data format error: the expression was rejected
pub const DATAERR: i32 = 65;

/// Input/output error
pub const IOERR: i32 = 74;

/// Configuration error
pub const CONFIG: i32 = 78;
