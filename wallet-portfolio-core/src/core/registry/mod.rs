//! Bounded LRU registry of computed views
//!
//! One registry exists per view kind. It remembers the parameters of the
//! most recently registered views, keeps one computed value per key, and
//! recomputes all of them whenever the raw token data changes.
//!
//! `params`, `order` and `values` always cover the same set of keys. They
//! live behind a single mutex so no reader can see them out of sync.

use metrics::counter;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use crate::core::store::TokenSnapshot;
use crate::domain::entities::ViewParams;
use crate::shared::constants::{METRIC_VIEW_EVICT, METRIC_VIEW_REGISTER};
use crate::shared::error::PortfolioError;
use crate::shared::types::{CacheKey, PortfolioResult, ViewKind};

pub type ComputeFn<P, V> = Box<dyn Fn(&TokenSnapshot, &P) -> V + Send + Sync>;

/// Key of a registered view plus the keys pushed out to make room for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub key: CacheKey,
    pub evicted: Vec<CacheKey>,
}

struct RegistryState<P, V> {
    params: HashMap<CacheKey, P>,
    /// Recency order, front is the oldest
    order: VecDeque<CacheKey>,
    values: Arc<HashMap<CacheKey, Arc<V>>>,
    applied_version: u64,
}

impl<P, V> Default for RegistryState<P, V> {
    fn default() -> Self {
        Self {
            params: HashMap::new(),
            order: VecDeque::new(),
            values: Arc::new(HashMap::new()),
            applied_version: 0,
        }
    }
}

impl<P, V> RegistryState<P, V> {
    fn check(&self, limit: usize) -> PortfolioResult<()> {
        if self.params.len() > limit {
            return Err(PortfolioError::invariant_violation(format!(
                "{} params registered, limit is {}",
                self.params.len(),
                limit
            )));
        }
        let ordered: HashSet<&CacheKey> = self.order.iter().collect();
        if ordered.len() != self.order.len() {
            return Err(PortfolioError::invariant_violation("duplicate key in recency order"));
        }
        let same_domain = ordered.len() == self.params.len()
            && self.values.len() == self.params.len()
            && self.params.keys().all(|key| ordered.contains(key) && self.values.contains_key(key));
        if !same_domain {
            return Err(PortfolioError::invariant_violation(format!(
                "key sets diverged: {} params, {} ordered, {} values",
                self.params.len(),
                self.order.len(),
                self.values.len()
            )));
        }
        Ok(())
    }

    /// Move or insert `key` at the back; returns keys dropped past `limit`
    fn touch(&mut self, key: &CacheKey, params: P, limit: usize) -> Vec<CacheKey> {
        if self.params.insert(key.clone(), params).is_some() {
            if let Some(position) = self.order.iter().position(|existing| existing == key) {
                self.order.remove(position);
            }
            self.order.push_back(key.clone());
            return Vec::new();
        }
        self.order.push_back(key.clone());
        let mut evicted = Vec::new();
        while self.order.len() > limit {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.params.remove(&oldest);
                    evicted.push(oldest);
                }
                None => break,
            }
        }
        evicted
    }
}

/// LRU registry for one view kind
pub struct ViewRegistry<P: ViewParams, V> {
    kind: ViewKind,
    limit: usize,
    compute: ComputeFn<P, V>,
    state: Mutex<RegistryState<P, V>>,
}

impl<P: ViewParams, V> ViewRegistry<P, V> {
    pub fn new(kind: ViewKind, limit: usize, compute: ComputeFn<P, V>) -> Self {
        Self {
            kind,
            limit: limit.max(1),
            compute,
            state: Mutex::new(RegistryState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState<P, V>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register interest in a view and compute it from `snapshot`.
    ///
    /// Re-registering a known key refreshes its recency and recomputes it.
    pub fn register(&self, params: P, snapshot: &TokenSnapshot) -> Registration {
        let mut state = self.lock();
        self.register_locked(&mut state, params, snapshot)
    }

    /// Same as [`register`](Self::register), reading the snapshot only once
    /// the registry lock is held
    pub fn register_with<F>(&self, params: P, snapshot: F) -> Registration
    where
        F: FnOnce() -> TokenSnapshot,
    {
        let mut state = self.lock();
        let snapshot = snapshot();
        self.register_locked(&mut state, params, &snapshot)
    }

    fn register_locked(
        &self,
        state: &mut RegistryState<P, V>,
        params: P,
        snapshot: &TokenSnapshot,
    ) -> Registration {
        let key = params.cache_key();
        let value = Arc::new((self.compute)(snapshot, &params));
        let evicted = state.touch(&key, params, self.limit);

        let mut values: HashMap<CacheKey, Arc<V>> = state
            .values
            .iter()
            .filter(|(existing, _)| !evicted.contains(*existing))
            .map(|(existing, value)| (existing.clone(), Arc::clone(value)))
            .collect();
        values.insert(key.clone(), value);
        state.values = Arc::new(values);

        counter!(METRIC_VIEW_REGISTER, "kind" => self.kind.name()).increment(1);
        if !evicted.is_empty() {
            counter!(METRIC_VIEW_EVICT, "kind" => self.kind.name()).increment(evicted.len() as u64);
            log::debug!("Evicted {} {} view(s): {:?}", evicted.len(), self.kind, evicted);
        }
        log::debug!("Registered {} view {}", self.kind, key);
        debug_assert!(state.check(self.limit).is_ok(), "{} registry out of sync", self.kind);

        Registration { key, evicted }
    }

    pub fn get(&self, key: &str) -> Option<Arc<V>> {
        self.lock().values.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().params.contains_key(key)
    }

    /// Recompute every registered view from `snapshot`.
    ///
    /// Returns `false` when the snapshot is older than the last one applied.
    pub fn rebuild(&self, snapshot: &TokenSnapshot) -> bool {
        let mut state = self.lock();
        if snapshot.version() < state.applied_version {
            log::debug!(
                "Skipping {} rebuild for stale version {} (applied {})",
                self.kind,
                snapshot.version(),
                state.applied_version
            );
            return false;
        }
        let values: HashMap<CacheKey, Arc<V>> = state
            .params
            .iter()
            .map(|(key, params)| (key.clone(), Arc::new((self.compute)(snapshot, params))))
            .collect();
        state.values = Arc::new(values);
        state.applied_version = snapshot.version();
        debug_assert!(state.check(self.limit).is_ok(), "{} registry out of sync", self.kind);
        true
    }

    /// Registered keys, oldest first
    pub fn keys(&self) -> Vec<CacheKey> {
        self.lock().order.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().params.is_empty()
    }

    pub fn applied_version(&self) -> u64 {
        self.lock().applied_version
    }

    pub fn clear(&self) {
        let mut state = self.lock();
        let applied_version = state.applied_version;
        *state = RegistryState::default();
        state.applied_version = applied_version;
    }

    pub fn check_invariants(&self) -> PortfolioResult<()> {
        self.lock().check(self.limit)
    }
}
