//! Balance refresh orchestration
//!
//! This module drives ingestion into the [`RawBalanceStore`]: the cached token
//! list is shown first, then realtime per-chain lists replace it. A chain that
//! fails to load contributes an empty list and never fails the refresh.

use chrono::Duration;
use futures::future::join_all;
use metrics::counter;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use crate::core::store::RawBalanceStore;
use crate::domain::entities::TokenItem;
use crate::domain::repositories::TokenSource;
use crate::infrastructure::config::CoreConfig;
use crate::shared::error::PortfolioError;
use crate::shared::constants::{
    DEFAULT_CACHE_CONCURRENCY, DEFAULT_DATA_TTL_SECS, DEFAULT_REALTIME_CONCURRENCY, METRIC_SOURCE_FAILURE,
};
use crate::shared::types::{Address, PortfolioResult};
use crate::shared::utils::{normalize_address, normalize_addresses};

/// Fetches token lists from a [`TokenSource`] and writes them into the store
pub struct BalanceRefresher {
    source: Arc<dyn TokenSource>,
    store: Arc<RawBalanceStore>,
    cache_concurrency: usize,
    realtime_permits: Arc<Semaphore>,
    data_ttl: Duration,
}

fn with_owner(tokens: Vec<TokenItem>, address: &str) -> Vec<TokenItem> {
    tokens
        .into_iter()
        .map(|mut token| {
            token.owner_addr = address.to_string();
            token
        })
        .collect()
}

impl BalanceRefresher {
    pub fn new(source: Arc<dyn TokenSource>, store: Arc<RawBalanceStore>) -> Self {
        Self::with_concurrency(source, store, DEFAULT_CACHE_CONCURRENCY, DEFAULT_REALTIME_CONCURRENCY)
    }

    pub fn from_config(source: Arc<dyn TokenSource>, store: Arc<RawBalanceStore>, config: &CoreConfig) -> Self {
        Self::with_concurrency(source, store, config.cache_concurrency, config.realtime_concurrency)
            .with_data_ttl(config.data_ttl())
    }

    pub fn with_concurrency(
        source: Arc<dyn TokenSource>,
        store: Arc<RawBalanceStore>,
        cache_concurrency: usize,
        realtime_concurrency: usize,
    ) -> Self {
        Self {
            source,
            store,
            cache_concurrency: cache_concurrency.max(1),
            realtime_permits: Arc::new(Semaphore::new(realtime_concurrency.max(1))),
            data_ttl: Duration::seconds(DEFAULT_DATA_TTL_SECS as i64),
        }
    }

    pub fn with_data_ttl(mut self, data_ttl: Duration) -> Self {
        self.data_ttl = data_ttl;
        self
    }

    pub fn store(&self) -> &Arc<RawBalanceStore> {
        &self.store
    }

    /// Refresh one address: cached list first, then every used chain.
    ///
    /// Cache and chain-list failures are returned; loading state is cleared
    /// either way.
    pub async fn refresh_address(&self, address: &str) -> PortfolioResult<()> {
        let address = normalize_address(address);
        if address.is_empty() {
            return Ok(());
        }
        self.store.mark_fetch_started(&address);
        let result = self.refresh_address_inner(&address).await;
        self.store.mark_fetch_finished(&address);
        if let Err(error) = &result {
            log::warn!("Refresh of {} failed: {}", address, error);
        }
        result
    }

    /// Refresh only when the last realtime list is older than the data TTL.
    ///
    /// Returns whether a fetch happened.
    pub async fn refresh_address_if_expired(&self, address: &str) -> PortfolioResult<bool> {
        if !self.store.is_expired(address, self.data_ttl) {
            log::debug!("Token list for {} is fresh, skipping refresh", normalize_address(address));
            return Ok(false);
        }
        self.refresh_address(address).await?;
        Ok(true)
    }

    /// Multi-address variant: refreshes all when any address has expired
    pub async fn refresh_addresses_if_expired<S: AsRef<str>>(&self, addresses: &[S]) -> PortfolioResult<bool> {
        let expired = addresses
            .iter()
            .any(|address| self.store.is_expired(address.as_ref(), self.data_ttl));
        if !expired {
            return Ok(false);
        }
        self.refresh_addresses(addresses).await?;
        Ok(true)
    }

    async fn refresh_address_inner(&self, address: &str) -> PortfolioResult<()> {
        let cached = self.source.cached_tokens(address).await?;
        self.store.set_address_tokens(address, with_owner(cached, address));
        self.store.mark_cache_loaded(address);

        let realtime = self.realtime_tokens(address).await?;
        log::debug!("Loaded {} realtime tokens for {}", realtime.len(), address);
        self.store.set_address_tokens(address, realtime);
        self.store.mark_fresh(address);
        Ok(())
    }

    /// Refresh many addresses, replacing the whole store twice: once with
    /// cached lists and once with realtime lists.
    ///
    /// Per-address failures are logged; an address whose chain list cannot be
    /// read is left out of the realtime map. When no address could be
    /// refreshed the cached lists stay in place and a source error is returned.
    pub async fn refresh_addresses<S: AsRef<str>>(&self, addresses: &[S]) -> PortfolioResult<()> {
        let addresses = normalize_addresses(addresses);
        self.store.set_loading(true);

        let cached = self.cached_lists(&addresses).await;
        self.store.replace_all(cached);

        let realtime: HashMap<Address, Vec<TokenItem>> = join_all(addresses.iter().map(|address| async move {
            match self.realtime_tokens(address).await {
                Ok(tokens) => Some((address.clone(), tokens)),
                Err(error) => {
                    log::warn!("Realtime refresh of {} failed: {}", address, error);
                    None
                }
            }
        }))
        .await
        .into_iter()
        .flatten()
        .collect();

        log::info!("Refreshed {} of {} addresses", realtime.len(), addresses.len());
        if realtime.is_empty() && !addresses.is_empty() {
            self.store.set_loading(false);
            return Err(PortfolioError::source(format!(
                "none of {} addresses could be refreshed",
                addresses.len()
            )));
        }
        for address in realtime.keys() {
            self.store.mark_fresh(address);
        }
        self.store.replace_all(realtime);
        self.store.set_loading(false);
        Ok(())
    }

    async fn cached_lists(&self, addresses: &[Address]) -> HashMap<Address, Vec<TokenItem>> {
        let permits = Semaphore::new(self.cache_concurrency);
        let permits = &permits;
        join_all(addresses.iter().map(|address| async move {
            let tokens = match permits.acquire().await {
                Ok(_permit) => self.source.cached_tokens(address).await,
                Err(error) => Err(error.into()),
            };
            let tokens = tokens.unwrap_or_else(|error| {
                counter!(METRIC_SOURCE_FAILURE, "read" => "cached").increment(1);
                log::warn!("Cached tokens for {} unavailable: {}", address, error);
                Vec::new()
            });
            (address.clone(), with_owner(tokens, address))
        }))
        .await
        .into_iter()
        .collect()
    }

    /// All chains of one address in chain-list order; failed chains are empty
    async fn realtime_tokens(&self, address: &str) -> PortfolioResult<Vec<TokenItem>> {
        let chains = self.source.used_chains(address).await?;
        let lists = join_all(chains.iter().map(|chain| async move {
            let tokens = match self.realtime_permits.acquire().await {
                Ok(_permit) => self.source.chain_tokens(address, chain).await,
                Err(error) => Err(error.into()),
            };
            tokens.unwrap_or_else(|error| {
                counter!(METRIC_SOURCE_FAILURE, "read" => "chain").increment(1);
                log::warn!("Tokens for {} on {} unavailable: {}", address, chain, error);
                Vec::new()
            })
        }))
        .await;
        Ok(with_owner(lists.into_iter().flatten().collect(), address))
    }
}
