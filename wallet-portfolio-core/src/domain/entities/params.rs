//! View parameter records and their cache keys
//!
//! Parameters are normalized when constructed, so two records that describe
//! the same view compare equal and produce the same [`CacheKey`].

use serde::{Deserialize, Serialize};
use crate::shared::constants::CACHE_KEY_SEPARATOR;
use crate::shared::types::{Address, CacheKey, ChainServerId};
use crate::shared::utils::{
    addresses_key, escape_key_part, flag_key, non_empty, normalize_address, normalize_addresses,
};

/// Parameters that identify one cached view
pub trait ViewParams: Clone + Send + Sync + 'static {
    /// Deterministic key; equal exactly when the parameters are equivalent
    fn cache_key(&self) -> CacheKey;
}

/// Join key parts; `addresses` is already escaped by `addresses_key`
fn join_key(addresses: &str, optional: &[Option<&str>], flag: bool) -> CacheKey {
    let mut parts = vec![addresses.to_string()];
    parts.extend(optional.iter().map(|part| escape_key_part(part.unwrap_or(""))));
    parts.push(flag_key(flag).to_string());
    parts.join(CACHE_KEY_SEPARATOR)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiAssetsParams {
    pub addresses: Vec<Address>,
    pub chain_server_id: Option<ChainServerId>,
    pub lp_token_enabled: bool,
}

impl MultiAssetsParams {
    pub fn new<S: AsRef<str>>(addresses: &[S], chain_server_id: Option<&str>, lp_token_enabled: bool) -> Self {
        Self {
            addresses: normalize_addresses(addresses),
            chain_server_id: non_empty(chain_server_id),
            lp_token_enabled,
        }
    }
}

impl ViewParams for MultiAssetsParams {
    fn cache_key(&self) -> CacheKey {
        join_key(
            &addresses_key(&self.addresses),
            &[self.chain_server_id.as_deref()],
            self.lp_token_enabled,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleAssetsParams {
    pub address: Address,
    pub chain_server_id: Option<ChainServerId>,
    pub lp_token_enabled: bool,
}

impl SingleAssetsParams {
    pub fn new(address: &str, chain_server_id: Option<&str>, lp_token_enabled: bool) -> Self {
        Self {
            address: normalize_address(address),
            chain_server_id: non_empty(chain_server_id),
            lp_token_enabled,
        }
    }
}

impl ViewParams for SingleAssetsParams {
    fn cache_key(&self) -> CacheKey {
        join_key(
            &escape_key_part(&self.address),
            &[self.chain_server_id.as_deref()],
            self.lp_token_enabled,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSelectParams {
    pub addresses: Vec<Address>,
    pub chain_server_id: Option<ChainServerId>,
    /// Lower-cased search keyword
    pub keyword: Option<String>,
    pub lp_token_enabled: bool,
}

impl TokenSelectParams {
    pub fn new<S: AsRef<str>>(
        addresses: &[S],
        chain_server_id: Option<&str>,
        keyword: Option<&str>,
        lp_token_enabled: bool,
    ) -> Self {
        Self {
            addresses: normalize_addresses(addresses),
            chain_server_id: non_empty(chain_server_id),
            keyword: keyword
                .filter(|keyword| !keyword.is_empty())
                .map(str::to_lowercase),
            lp_token_enabled,
        }
    }
}

impl ViewParams for TokenSelectParams {
    fn cache_key(&self) -> CacheKey {
        join_key(
            &addresses_key(&self.addresses),
            &[self.chain_server_id.as_deref(), self.keyword.as_deref()],
            self.lp_token_enabled,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerpsTokenSelectParams {
    pub address: Address,
}

impl PerpsTokenSelectParams {
    /// `None` when no address is selected
    pub fn new(address: Option<&str>) -> Option<Self> {
        let address = normalize_address(address?);
        if address.is_empty() {
            return None;
        }
        Some(Self { address })
    }
}

impl ViewParams for PerpsTokenSelectParams {
    fn cache_key(&self) -> CacheKey {
        escape_key_part(&self.address)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainSelectorParams {
    pub addresses: Vec<Address>,
}

impl ChainSelectorParams {
    pub fn new<S: AsRef<str>>(addresses: &[S]) -> Self {
        Self {
            addresses: normalize_addresses(addresses),
        }
    }
}

impl ViewParams for ChainSelectorParams {
    fn cache_key(&self) -> CacheKey {
        addresses_key(&self.addresses)
    }
}
