//! Core portfolio functionality
//!
//! This module contains the raw balance store, the view computations, the
//! LRU view registries, the cache service on top of them and the refresh
//! driver that feeds the store.

pub mod portfolio;
pub mod store;
pub mod registry;
pub mod service;
pub mod refresh;

pub use registry::{Registration, ViewRegistry};
pub use refresh::BalanceRefresher;
pub use service::PortfolioCacheService;
pub use store::{LoadingState, RawBalanceStore, SnapshotObserver, SubscriptionId, TokenSnapshot};
