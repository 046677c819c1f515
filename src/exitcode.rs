//! Standard exit codes (BSD sysexits.h compatible)

/// Successful termination
pub const OK: i32 = 0;

/// Command line usage error
pub const USAGE: i32 = 64;

/// Cannot open input (unknown or missing document)
pub const NOINPUT: i32 = 66;

/// Internal software error
pub const SOFTWARE: i32 = 70;

/// System error (e.g., can't fork)
pub const OSERR: i32 = 71;

/// Input/output error
pub const IOERR: i32 = 74;

/// Configuration error
pub const CONFIG: i32 = 78;

/// Child program not found (shell convention)
pub const COMMAND_NOT_FOUND: i32 = 127;

/// Offset added to a signal number when a child is killed by it (shell convention)
pub const SIGNAL_BASE: i32 = 128;
