//! Utility modules for common functionality.
//!
//! Logging setup and the scope guard used to release file locks.

pub mod guard;
pub mod logger;
