//! Beta capacity limits
//!
//! Soft product caps enforced at signup, add-entry, and import time.
//! Never expressed as storage constraints; the server configuration can
//! override both values.

/// Default maximum number of library entries per user
pub const MAX_ALBUMS_PER_USER: i64 = 500;

/// Default maximum number of accounts
pub const MAX_USERS: i64 = 50;
