//! Raw balance store
//!
//! Holds the last-known token list per address. Every mutation publishes a
//! new immutable [`TokenSnapshot`] with a higher version and notifies the
//! registered observers once the write lock has been released.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use crate::domain::entities::TokenItem;
use crate::shared::types::Address;
use crate::shared::utils::normalize_address;

type TokenLists = HashMap<Address, Arc<Vec<TokenItem>>>;

/// Immutable, versioned view of every address's token list
#[derive(Debug, Clone, Default)]
pub struct TokenSnapshot {
    version: u64,
    token_lists: Arc<TokenLists>,
}

impl TokenSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a snapshot from plain lists; address keys are normalized
    pub fn from_lists(version: u64, lists: HashMap<Address, Vec<TokenItem>>) -> Self {
        let token_lists = lists
            .into_iter()
            .map(|(address, tokens)| (normalize_address(&address), Arc::new(tokens)))
            .collect();
        Self {
            version,
            token_lists: Arc::new(token_lists),
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn tokens_for(&self, address: &str) -> &[TokenItem] {
        self.token_lists
            .get(&normalize_address(address))
            .map(|tokens| tokens.as_slice())
            .unwrap_or(&[])
    }

    /// Tokens of several addresses, concatenated in the order given
    pub fn tokens_of<'a>(&'a self, addresses: &'a [Address]) -> impl Iterator<Item = &'a TokenItem> + 'a {
        addresses.iter().flat_map(move |address| self.tokens_for(address).iter())
    }

    pub fn addresses(&self) -> impl Iterator<Item = &Address> {
        self.token_lists.keys()
    }

    pub fn address_count(&self) -> usize {
        self.token_lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.token_lists.is_empty()
    }

    fn list_arc(&self, address: &str) -> Option<Arc<Vec<TokenItem>>> {
        self.token_lists.get(address).cloned()
    }

    fn next(&self, token_lists: TokenLists) -> Self {
        Self {
            version: self.version + 1,
            token_lists: Arc::new(token_lists),
        }
    }
}

/// Per-address fetch progress: the cached list arrives first, realtime lists later
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingState {
    pub loading: bool,
    pub all_loading: bool,
}

pub type SubscriptionId = u64;
pub type SnapshotObserver = Arc<dyn Fn(&TokenSnapshot) + Send + Sync>;

#[derive(Default)]
struct StoreState {
    snapshot: TokenSnapshot,
    loading_by_address: HashMap<Address, LoadingState>,
    fetched_at: HashMap<Address, DateTime<Utc>>,
    is_loading: bool,
}

/// Owner of the raw token lists; the only writer is the ingestion path
#[derive(Default)]
pub struct RawBalanceStore {
    state: RwLock<StoreState>,
    observers: RwLock<Vec<(SubscriptionId, SnapshotObserver)>>,
    next_subscription: AtomicU64,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

impl RawBalanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot; later mutations never affect it
    pub fn snapshot(&self) -> TokenSnapshot {
        read(&self.state).snapshot.clone()
    }

    pub fn version(&self) -> u64 {
        read(&self.state).snapshot.version()
    }

    pub fn tokens_for(&self, address: &str) -> Arc<Vec<TokenItem>> {
        read(&self.state)
            .snapshot
            .list_arc(&normalize_address(address))
            .unwrap_or_default()
    }

    /// Register a change observer; it runs synchronously after each mutation
    pub fn subscribe(&self, observer: SnapshotObserver) -> SubscriptionId {
        let id = self.next_subscription.fetch_add(1, Ordering::Relaxed);
        write(&self.observers).push((id, observer));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = write(&self.observers);
        let before = observers.len();
        observers.retain(|(observer_id, _)| *observer_id != id);
        observers.len() != before
    }

    /// Replace every address's list at once
    pub fn replace_all(&self, lists: HashMap<Address, Vec<TokenItem>>) {
        let token_lists: TokenLists = lists
            .into_iter()
            .map(|(address, tokens)| (normalize_address(&address), Arc::new(tokens)))
            .collect();
        self.publish(|_| token_lists);
    }

    /// Replace one address's list, keeping the others
    pub fn set_address_tokens(&self, address: &str, tokens: Vec<TokenItem>) {
        let address = normalize_address(address);
        self.publish(move |current| {
            let mut next = current.clone();
            next.insert(address, Arc::new(tokens));
            next
        });
    }

    pub fn remove_address(&self, address: &str) {
        let address = normalize_address(address);
        self.publish(move |current| {
            let mut next = current.clone();
            next.remove(&address);
            next
        });
    }

    /// Group a flat token list by owner and replace the whole map
    pub fn ingest_flat(&self, tokens: Vec<TokenItem>) {
        let mut grouped: HashMap<Address, Vec<TokenItem>> = HashMap::new();
        for token in tokens {
            grouped
                .entry(normalize_address(&token.owner_addr))
                .or_default()
                .push(token);
        }
        self.replace_all(grouped);
    }

    fn publish<F>(&self, build: F)
    where
        F: FnOnce(&TokenLists) -> TokenLists,
    {
        let snapshot = {
            let mut state = write(&self.state);
            let next = state.snapshot.next(build(&state.snapshot.token_lists));
            state.snapshot = next.clone();
            next
        };
        log::debug!(
            "Token store updated to version {} ({} addresses)",
            snapshot.version(),
            snapshot.address_count()
        );
        self.notify(&snapshot);
    }

    fn notify(&self, snapshot: &TokenSnapshot) {
        let observers: Vec<SnapshotObserver> = read(&self.observers)
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();
        for observer in observers {
            observer(snapshot);
        }
    }

    pub fn is_loading(&self) -> bool {
        read(&self.state).is_loading
    }

    pub fn set_loading(&self, loading: bool) {
        write(&self.state).is_loading = loading;
    }

    pub fn loading_state(&self, address: &str) -> LoadingState {
        read(&self.state)
            .loading_by_address
            .get(&normalize_address(address))
            .copied()
            .unwrap_or_default()
    }

    fn set_loading_state(&self, address: &str, loading: LoadingState) {
        write(&self.state)
            .loading_by_address
            .insert(normalize_address(address), loading);
    }

    pub fn mark_fetch_started(&self, address: &str) {
        self.set_loading_state(address, LoadingState { loading: true, all_loading: true });
    }

    /// Cached list is in; realtime lists are still pending
    pub fn mark_cache_loaded(&self, address: &str) {
        self.set_loading_state(address, LoadingState { loading: false, all_loading: true });
    }

    pub fn mark_fetch_finished(&self, address: &str) {
        self.set_loading_state(address, LoadingState { loading: false, all_loading: false });
    }

    /// Record a completed realtime fetch for `address`
    pub fn mark_fresh(&self, address: &str) {
        self.mark_fresh_at(address, Utc::now());
    }

    pub fn mark_fresh_at(&self, address: &str, at: DateTime<Utc>) {
        write(&self.state).fetched_at.insert(normalize_address(address), at);
    }

    pub fn fetched_at(&self, address: &str) -> Option<DateTime<Utc>> {
        read(&self.state).fetched_at.get(&normalize_address(address)).copied()
    }

    /// Whether the realtime list is missing or older than `ttl`
    pub fn is_expired(&self, address: &str, ttl: Duration) -> bool {
        match self.fetched_at(address) {
            Some(fetched_at) => Utc::now() - fetched_at >= ttl,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn token(id: &str, owner: &str) -> TokenItem {
        TokenItem::new(id, "eth", id.to_uppercase(), owner)
    }

    #[test]
    fn test_snapshot_is_isolated_from_later_writes() {
        let store = RawBalanceStore::new();
        store.set_address_tokens("0xAA", vec![token("a", "0xaa")]);
        let before = store.snapshot();

        store.set_address_tokens("0xaa", vec![token("b", "0xaa"), token("c", "0xaa")]);

        assert_eq!(before.tokens_for("0xaa").len(), 1);
        assert_eq!(store.snapshot().tokens_for("0xAA").len(), 2);
        assert_eq!(store.snapshot().version(), before.version() + 1);
    }

    #[test]
    fn test_set_address_keeps_other_addresses() {
        let store = RawBalanceStore::new();
        store.set_address_tokens("0xaa", vec![token("a", "0xaa")]);
        store.set_address_tokens("0xbb", vec![token("b", "0xbb")]);
        assert_eq!(store.snapshot().address_count(), 2);

        store.remove_address("0xAA");
        assert_eq!(store.snapshot().address_count(), 1);
        assert!(store.tokens_for("0xaa").is_empty());
    }

    #[test]
    fn test_ingest_flat_groups_by_owner() {
        let store = RawBalanceStore::new();
        store.set_address_tokens("0xcc", vec![token("stale", "0xcc")]);
        store.ingest_flat(vec![token("a", "0xAA"), token("b", "0xbb"), token("c", "0xaa")]);

        let snapshot = store.snapshot();
        assert_eq!(snapshot.tokens_for("0xaa").len(), 2);
        assert_eq!(snapshot.tokens_for("0xbb").len(), 1);
        assert!(snapshot.tokens_for("0xcc").is_empty());
    }

    #[test]
    fn test_tokens_of_preserves_address_order() {
        let store = RawBalanceStore::new();
        store.ingest_flat(vec![token("a", "0xaa"), token("b", "0xbb")]);
        let snapshot = store.snapshot();
        let addresses = vec!["0xbb".to_string(), "0xaa".to_string()];
        let ids: Vec<&str> = snapshot.tokens_of(&addresses).map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_observers_receive_each_version() {
        let store = RawBalanceStore::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let id = store.subscribe(Arc::new(move |snapshot: &TokenSnapshot| {
            sink.lock().expect("observer sink lock").push(snapshot.version());
        }));

        store.set_address_tokens("0xaa", vec![]);
        store.set_address_tokens("0xbb", vec![]);
        assert!(store.unsubscribe(id));
        store.set_address_tokens("0xcc", vec![]);

        assert_eq!(*seen.lock().expect("observer sink lock"), vec![1, 2]);
        assert!(!store.unsubscribe(id));
    }

    #[test]
    fn test_observer_can_read_store_without_deadlock() {
        let store = Arc::new(RawBalanceStore::new());
        let inner = Arc::clone(&store);
        let seen = Arc::new(Mutex::new(0usize));
        let sink = Arc::clone(&seen);
        store.subscribe(Arc::new(move |_: &TokenSnapshot| {
            *sink.lock().expect("observer sink lock") = inner.snapshot().address_count();
        }));
        store.set_address_tokens("0xaa", vec![token("a", "0xaa")]);
        assert_eq!(*seen.lock().expect("observer sink lock"), 1);
    }

    #[test]
    fn test_loading_state_transitions() {
        let store = RawBalanceStore::new();
        assert_eq!(store.loading_state("0xaa"), LoadingState::default());

        store.mark_fetch_started("0xAA");
        assert_eq!(store.loading_state("0xaa"), LoadingState { loading: true, all_loading: true });
        store.mark_cache_loaded("0xaa");
        assert_eq!(store.loading_state("0xaa"), LoadingState { loading: false, all_loading: true });
        store.mark_fetch_finished("0xaa");
        assert_eq!(store.loading_state("0xaa"), LoadingState::default());

        store.set_loading(true);
        assert!(store.is_loading());
        // loading changes do not bump the snapshot version
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn test_expiry_follows_fetch_time() {
        let store = RawBalanceStore::new();
        assert!(store.is_expired("0xaa", Duration::seconds(300)));

        store.mark_fresh("0xAA");
        assert!(!store.is_expired("0xaa", Duration::seconds(300)));
        assert!(store.is_expired("0xaa", Duration::zero()));

        store.mark_fresh_at("0xaa", Utc::now() - Duration::seconds(600));
        assert!(store.is_expired("0xaa", Duration::seconds(300)));
    }
}
