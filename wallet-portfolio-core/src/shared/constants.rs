//! Constants for the portfolio core
//!
//! This module contains all constants used throughout the portfolio core.

// View cache constants
pub const COMPUTED_CACHE_LIMIT: usize = 10;
pub const CACHE_KEY_SEPARATOR: &str = "::";
pub const ADDRESS_KEY_SEPARATOR: &str = "|";

// Fold constants
pub const MAX_UNFOLDED_TOKENS: usize = 20;
pub const FOLD_THRESHOLD_DIVISOR: f64 = 100.0;
pub const FOLD_THRESHOLD_CAP: f64 = 1000.0;
pub const EXPAND_SWITCH_MIN_CORE_TOKENS: usize = 15;
pub const EXPAND_SWITCH_MIN_TAIL: usize = 4;

// Search scores
pub const SCORE_EXACT_CORE: u8 = 4;
pub const SCORE_EXACT_NON_CORE: u8 = 3;
pub const SCORE_PARTIAL_CORE: u8 = 2;
pub const SCORE_PARTIAL_NON_CORE: u8 = 1;

// Refresh constants
pub const DEFAULT_CACHE_CONCURRENCY: usize = 5;
pub const DEFAULT_REALTIME_CONCURRENCY: usize = 15;
pub const DEFAULT_DATA_TTL_SECS: u64 = 300;

// Configuration
pub const CONFIG_ENV_PREFIX: &str = "PORTFOLIO_CORE";
pub const DEFAULT_LOG_LEVEL: &str = "info";

// Metric names
pub const METRIC_VIEW_REGISTER: &str = "portfolio_view_register_total";
pub const METRIC_VIEW_EVICT: &str = "portfolio_view_evict_total";
pub const METRIC_VIEW_REBUILD: &str = "portfolio_view_rebuild_total";
pub const METRIC_REBUILD_DURATION: &str = "portfolio_rebuild_duration_ms";
pub const METRIC_SOURCE_FAILURE: &str = "portfolio_source_failure_total";

// Build information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
