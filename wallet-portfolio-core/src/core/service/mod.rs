//! Portfolio cache service
//!
//! This module owns the five view registries and exposes the register/get
//! API used by screens. It also acts as the invalidator: it subscribes to the
//! raw balance store and rebuilds every registered view on each change.

use metrics::{counter, histogram};
use std::sync::{Arc, OnceLock, Weak};
use std::time::Instant;
use crate::core::portfolio::views::{
    compute_chain_selector, compute_multi_assets, compute_perps_token_select, compute_single_assets,
    compute_token_select,
};
use crate::core::registry::ViewRegistry;
use crate::core::store::{RawBalanceStore, SubscriptionId, TokenSnapshot};
use crate::domain::entities::{
    ChainSelectorParams, ComputedView, MultiAssetsParams, PerpsTokenSelectParams, SingleAssetsParams, TokenAssets,
    TokenList, TokenSelectParams,
};
use crate::domain::policies::LpTokenPolicy;
use crate::shared::constants::{
    COMPUTED_CACHE_LIMIT, METRIC_REBUILD_DURATION, METRIC_SOURCE_FAILURE, METRIC_VIEW_EVICT, METRIC_VIEW_REBUILD,
    METRIC_VIEW_REGISTER,
};
use crate::shared::types::{CacheKey, PortfolioResult, ViewKind};

static METRIC_DESCRIPTORS: OnceLock<()> = OnceLock::new();

fn init_metric_descriptors() {
    METRIC_DESCRIPTORS.get_or_init(|| {
        metrics::describe_counter!(METRIC_VIEW_REGISTER, "Total number of view registrations grouped by kind");
        metrics::describe_counter!(METRIC_VIEW_EVICT, "Total number of views evicted from the LRU grouped by kind");
        metrics::describe_counter!(METRIC_VIEW_REBUILD, "Total number of registry rebuilds grouped by kind");
        metrics::describe_histogram!(
            METRIC_REBUILD_DURATION,
            "Time spent rebuilding all registered views in milliseconds"
        );
        metrics::describe_counter!(METRIC_SOURCE_FAILURE, "Total number of failed token source reads");
    });
}

/// Registries for every view kind, rebuilt on raw data changes
pub struct PortfolioCacheService {
    store: Arc<RawBalanceStore>,
    policy: Arc<dyn LpTokenPolicy>,
    multi_assets: ViewRegistry<MultiAssetsParams, TokenAssets>,
    single_assets: ViewRegistry<SingleAssetsParams, TokenAssets>,
    token_select: ViewRegistry<TokenSelectParams, TokenList>,
    perps_token_select: ViewRegistry<PerpsTokenSelectParams, TokenList>,
    chain_selector: ViewRegistry<ChainSelectorParams, TokenList>,
    subscription: OnceLock<SubscriptionId>,
}

impl PortfolioCacheService {
    /// Create a service with the default cache limit and subscribe it to `store`
    pub fn new(store: Arc<RawBalanceStore>, policy: Arc<dyn LpTokenPolicy>) -> Arc<Self> {
        Self::with_limit(store, policy, COMPUTED_CACHE_LIMIT)
    }

    pub fn with_limit(store: Arc<RawBalanceStore>, policy: Arc<dyn LpTokenPolicy>, limit: usize) -> Arc<Self> {
        init_metric_descriptors();

        let multi_policy = Arc::clone(&policy);
        let single_policy = Arc::clone(&policy);
        let select_policy = Arc::clone(&policy);

        let service = Arc::new(Self {
            store: Arc::clone(&store),
            multi_assets: ViewRegistry::new(
                ViewKind::MultiAssets,
                limit,
                Box::new(move |snapshot: &TokenSnapshot, params: &MultiAssetsParams| {
                    compute_multi_assets(snapshot, params, multi_policy.as_ref())
                }),
            ),
            single_assets: ViewRegistry::new(
                ViewKind::SingleAssets,
                limit,
                Box::new(move |snapshot: &TokenSnapshot, params: &SingleAssetsParams| {
                    compute_single_assets(snapshot, params, single_policy.as_ref())
                }),
            ),
            token_select: ViewRegistry::new(
                ViewKind::TokenSelect,
                limit,
                Box::new(move |snapshot: &TokenSnapshot, params: &TokenSelectParams| {
                    compute_token_select(snapshot, params, select_policy.as_ref())
                }),
            ),
            perps_token_select: ViewRegistry::new(ViewKind::PerpsTokenSelect, limit, Box::new(compute_perps_token_select)),
            chain_selector: ViewRegistry::new(ViewKind::ChainSelector, limit, Box::new(compute_chain_selector)),
            policy,
            subscription: OnceLock::new(),
        });

        let weak: Weak<Self> = Arc::downgrade(&service);
        let id = store.subscribe(Arc::new(move |snapshot: &TokenSnapshot| {
            if let Some(service) = weak.upgrade() {
                service.on_raw_data_changed(snapshot);
            }
        }));
        let _ = service.subscription.set(id);

        log::info!("Portfolio cache service started with view limit {}", limit);
        service
    }

    pub fn store(&self) -> &Arc<RawBalanceStore> {
        &self.store
    }

    pub fn policy(&self) -> &Arc<dyn LpTokenPolicy> {
        &self.policy
    }

    pub fn register_multi_assets<S: AsRef<str>>(
        &self,
        addresses: &[S],
        chain_server_id: Option<&str>,
        lp_token_enabled: bool,
    ) -> CacheKey {
        let params = MultiAssetsParams::new(addresses, chain_server_id, lp_token_enabled);
        self.multi_assets.register_with(params, || self.store.snapshot()).key
    }

    pub fn register_single_assets(&self, address: &str, chain_server_id: Option<&str>, lp_token_enabled: bool) -> CacheKey {
        let params = SingleAssetsParams::new(address, chain_server_id, lp_token_enabled);
        self.single_assets.register_with(params, || self.store.snapshot()).key
    }

    pub fn register_token_select<S: AsRef<str>>(
        &self,
        addresses: &[S],
        chain_server_id: Option<&str>,
        keyword: Option<&str>,
        lp_token_enabled: bool,
    ) -> CacheKey {
        let params = TokenSelectParams::new(addresses, chain_server_id, keyword, lp_token_enabled);
        self.token_select.register_with(params, || self.store.snapshot()).key
    }

    /// Returns `None` when no address is given
    pub fn register_perps_token_select(&self, address: Option<&str>) -> Option<CacheKey> {
        let params = PerpsTokenSelectParams::new(address)?;
        Some(self.perps_token_select.register_with(params, || self.store.snapshot()).key)
    }

    pub fn register_chain_selector<S: AsRef<str>>(&self, addresses: &[S]) -> CacheKey {
        let params = ChainSelectorParams::new(addresses);
        self.chain_selector.register_with(params, || self.store.snapshot()).key
    }

    /// Kind-erased lookup; evicted or unknown keys yield `None`
    pub fn get_view(&self, kind: ViewKind, key: &str) -> Option<ComputedView> {
        match kind {
            ViewKind::MultiAssets => self.multi_assets.get(key).map(ComputedView::Assets),
            ViewKind::SingleAssets => self.single_assets.get(key).map(ComputedView::Assets),
            ViewKind::TokenSelect => self.token_select.get(key).map(ComputedView::Tokens),
            ViewKind::PerpsTokenSelect => self.perps_token_select.get(key).map(ComputedView::Tokens),
            ViewKind::ChainSelector => self.chain_selector.get(key).map(ComputedView::Tokens),
        }
    }

    pub fn multi_assets(&self, key: &str) -> Option<Arc<TokenAssets>> {
        self.multi_assets.get(key)
    }

    pub fn single_assets(&self, key: &str) -> Option<Arc<TokenAssets>> {
        self.single_assets.get(key)
    }

    pub fn token_select(&self, key: &str) -> Option<Arc<TokenList>> {
        self.token_select.get(key)
    }

    pub fn perps_token_select(&self, key: &str) -> Option<Arc<TokenList>> {
        self.perps_token_select.get(key)
    }

    /// Perps list for an optional key; a missing key reads as an empty list
    pub fn perps_token_select_or_empty(&self, key: Option<&str>) -> Arc<TokenList> {
        key.and_then(|key| self.perps_token_select.get(key))
            .unwrap_or_default()
    }

    pub fn chain_selector(&self, key: &str) -> Option<Arc<TokenList>> {
        self.chain_selector.get(key)
    }

    /// Registered keys of one kind, oldest first
    pub fn registered_keys(&self, kind: ViewKind) -> Vec<CacheKey> {
        match kind {
            ViewKind::MultiAssets => self.multi_assets.keys(),
            ViewKind::SingleAssets => self.single_assets.keys(),
            ViewKind::TokenSelect => self.token_select.keys(),
            ViewKind::PerpsTokenSelect => self.perps_token_select.keys(),
            ViewKind::ChainSelector => self.chain_selector.keys(),
        }
    }

    /// Recompute every registered view of every kind from `snapshot`
    pub fn on_raw_data_changed(&self, snapshot: &TokenSnapshot) {
        let started = Instant::now();
        let rebuilt = [
            (ViewKind::MultiAssets, self.multi_assets.rebuild(snapshot)),
            (ViewKind::SingleAssets, self.single_assets.rebuild(snapshot)),
            (ViewKind::TokenSelect, self.token_select.rebuild(snapshot)),
            (ViewKind::PerpsTokenSelect, self.perps_token_select.rebuild(snapshot)),
            (ViewKind::ChainSelector, self.chain_selector.rebuild(snapshot)),
        ];
        for (kind, applied) in rebuilt {
            if applied {
                counter!(METRIC_VIEW_REBUILD, "kind" => kind.name()).increment(1);
            }
        }
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        histogram!(METRIC_REBUILD_DURATION).record(elapsed_ms);
        log::debug!("Rebuilt portfolio views for version {} in {:.2}ms", snapshot.version(), elapsed_ms);
    }

    pub fn check_invariants(&self) -> PortfolioResult<()> {
        self.multi_assets.check_invariants()?;
        self.single_assets.check_invariants()?;
        self.token_select.check_invariants()?;
        self.perps_token_select.check_invariants()?;
        self.chain_selector.check_invariants()
    }

    /// Forget every registered view
    pub fn clear(&self) {
        self.multi_assets.clear();
        self.single_assets.clear();
        self.token_select.clear();
        self.perps_token_select.clear();
        self.chain_selector.clear();
    }
}

impl Drop for PortfolioCacheService {
    fn drop(&mut self) {
        if let Some(id) = self.subscription.get() {
            self.store.unsubscribe(*id);
        }
    }
}
