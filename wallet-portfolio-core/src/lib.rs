//! Wallet Portfolio Core
//!
//! Derived portfolio views over raw per-address token balances.
//!
//! ## Architecture
//!
//! - **Core**: raw balance store, view computations, LRU registries, cache service, refresh
//! - **Domain**: token entities, view parameters, the token source and LP policy seams
//! - **Shared**: common types, constants, errors and utilities
//! - **Infrastructure**: configuration and logging
//!
//! ## Usage
//!
//! ```rust
//! use wallet_portfolio_core::{PortfolioCacheService, ProtocolLpTokenPolicy, RawBalanceStore, TokenItem};
//! use std::sync::Arc;
//!
//! let store = Arc::new(RawBalanceStore::new());
//! let service = PortfolioCacheService::new(Arc::clone(&store), Arc::new(ProtocolLpTokenPolicy));
//!
//! let key = service.register_multi_assets(&["0xAbC"], None, false);
//! store.set_address_tokens(
//!     "0xabc",
//!     vec![TokenItem::new("eth", "eth", "ETH", "0xabc").with_core(Some(true)).with_balance(1.0, 2000.0)],
//! );
//!
//! let assets = service.multi_assets(&key).expect("registered view");
//! assert_eq!(assets.un_fold_tokens.len(), 1);
//! ```

use dotenv::dotenv;
use std::sync::Arc;

pub mod core;
pub mod domain;
pub mod shared;
pub mod infrastructure;

// Re-export specific components
pub use crate::core::{BalanceRefresher, LoadingState, PortfolioCacheService, RawBalanceStore, TokenSnapshot};
pub use crate::infrastructure::CoreConfig;

// Re-export domain entities
pub use crate::domain::{
    ComputedView, LpTokenPolicy, ProtocolLpTokenPolicy, ShowAllLpTokenPolicy, TokenAssets, TokenItem, TokenList,
    TokenSource,
};

// Re-export shared types
pub use shared::error::PortfolioError;
pub use shared::types::{Address, CacheKey, ChainServerId, PortfolioResult, ViewKind};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Initialize logging with the level from configuration
pub fn init() -> PortfolioResult<()> {
    let config = CoreConfig::load()?;
    infrastructure::init_logging(&config.log_level);
    log::info!("{} {} initialised", NAME, VERSION);
    Ok(())
}

/// Wired store, policy and cache service
pub struct PortfolioCore {
    pub config: CoreConfig,
    pub store: Arc<RawBalanceStore>,
    pub service: Arc<PortfolioCacheService>,
}

impl PortfolioCore {
    /// Build a refresher that writes into this core's store
    pub fn refresher(&self, source: Arc<dyn TokenSource>) -> BalanceRefresher {
        BalanceRefresher::from_config(source, Arc::clone(&self.store), &self.config)
    }
}

/// Initialize the portfolio core with configuration from .env or safe defaults
pub fn init_portfolio_core() -> PortfolioResult<PortfolioCore> {
    dotenv().ok();
    let config = CoreConfig::load()?;
    Ok(build_portfolio_core(config))
}

/// Wire a core from an explicit configuration
pub fn build_portfolio_core(config: CoreConfig) -> PortfolioCore {
    let store = Arc::new(RawBalanceStore::new());
    let service = PortfolioCacheService::with_limit(
        Arc::clone(&store),
        Arc::new(ProtocolLpTokenPolicy),
        config.cache_limit,
    );
    PortfolioCore { config, store, service }
}
