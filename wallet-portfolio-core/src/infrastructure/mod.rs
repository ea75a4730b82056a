//! Infrastructure layer - configuration and logging
//!
//! This module contains the process-level plumbing around the portfolio core:
//! environment-driven configuration and logger setup.

pub mod config;
pub mod logger;

// Re-export infrastructure components
pub use self::config::CoreConfig;
pub use self::logger::init_logging;
