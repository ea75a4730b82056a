//! Token source repository
//!
//! The balance API and its local cache live outside this crate; the refresher
//! only needs these three reads.

use async_trait::async_trait;
use crate::domain::entities::TokenItem;
use crate::shared::types::{ChainServerId, PortfolioResult};

/// Source of raw token balances for an address
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Last cached token list for the address, fast but possibly stale
    async fn cached_tokens(&self, address: &str) -> PortfolioResult<Vec<TokenItem>>;

    /// Chains on which the address has ever held assets
    async fn used_chains(&self, address: &str) -> PortfolioResult<Vec<ChainServerId>>;

    /// Realtime token list for the address on one chain
    async fn chain_tokens(&self, address: &str, chain: &str) -> PortfolioResult<Vec<TokenItem>>;
}
