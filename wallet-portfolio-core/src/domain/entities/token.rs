//! Token entity for the portfolio core

use serde::{Deserialize, Serialize};
use crate::shared::types::{Address, ChainServerId};

/// A single token balance held by one address on one chain.
///
/// Immutable per snapshot; the store replaces whole lists instead of
/// mutating items in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenItem {
    pub id: String,
    pub chain: ChainServerId,
    pub symbol: String,
    #[serde(default)]
    pub display_symbol: Option<String>,
    #[serde(default)]
    pub name: String,
    pub decimals: u32,
    pub amount: f64,
    pub price: f64,
    #[serde(default)]
    pub usd_value: Option<f64>,
    #[serde(default)]
    pub is_core: Option<bool>,
    #[serde(default)]
    pub is_verified: Option<bool>,
    #[serde(default)]
    pub is_suspicious: bool,
    #[serde(default)]
    pub protocol_id: Option<String>,
    pub owner_addr: Address,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub time_at: i64,
}

impl TokenItem {
    pub fn new(
        id: impl Into<String>,
        chain: impl Into<String>,
        symbol: impl Into<String>,
        owner_addr: impl Into<String>,
    ) -> Self {
        let symbol = symbol.into();
        Self {
            id: id.into(),
            chain: chain.into(),
            name: symbol.clone(),
            symbol,
            display_symbol: None,
            decimals: 18,
            amount: 0.0,
            price: 0.0,
            usd_value: None,
            is_core: None,
            is_verified: None,
            is_suspicious: false,
            protocol_id: None,
            owner_addr: owner_addr.into(),
            logo_url: None,
            time_at: 0,
        }
    }

    /// Set amount and price; the USD value follows from them
    pub fn with_balance(mut self, amount: f64, price: f64) -> Self {
        self.amount = amount;
        self.price = price;
        self.usd_value = Some(amount * price);
        self
    }

    pub fn with_usd_value(mut self, usd_value: Option<f64>) -> Self {
        self.usd_value = usd_value;
        self
    }

    pub fn with_core(mut self, is_core: Option<bool>) -> Self {
        self.is_core = is_core;
        self
    }

    pub fn with_verified(mut self, is_verified: Option<bool>) -> Self {
        self.is_verified = is_verified;
        self
    }

    pub fn with_suspicious(mut self, is_suspicious: bool) -> Self {
        self.is_suspicious = is_suspicious;
        self
    }

    pub fn with_protocol(mut self, protocol_id: impl Into<String>) -> Self {
        self.protocol_id = Some(protocol_id.into());
        self
    }

    /// Reported USD value, zero when upstream omitted it
    pub fn usd_value_or_zero(&self) -> f64 {
        self.usd_value.unwrap_or(0.0)
    }

    /// Reported USD value, falling back to `price * amount` when missing or zero
    pub fn fallback_usd_value(&self) -> f64 {
        match self.usd_value {
            Some(value) if value != 0.0 => value,
            _ => self.nominal_value(),
        }
    }

    pub fn nominal_value(&self) -> f64 {
        self.price * self.amount
    }

    pub fn is_core_token(&self) -> bool {
        self.is_core == Some(true)
    }

    pub fn has_protocol(&self) -> bool {
        self.protocol_id.as_deref().is_some_and(|id| !id.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_value_fallbacks() {
        let token = TokenItem::new("eth", "eth", "ETH", "0xaa").with_balance(2.0, 1500.0);
        assert_eq!(token.usd_value_or_zero(), 3000.0);

        let missing = token.clone().with_usd_value(None);
        assert_eq!(missing.usd_value_or_zero(), 0.0);
        assert_eq!(missing.fallback_usd_value(), 3000.0);

        let zero = token.with_usd_value(Some(0.0));
        assert_eq!(zero.fallback_usd_value(), 3000.0);
    }

    #[test]
    fn test_token_deserialize_defaults() {
        let json = r#"{
            "id": "0xa0b8",
            "chain": "eth",
            "symbol": "USDC",
            "decimals": 6,
            "amount": 10.0,
            "price": 1.0,
            "owner_addr": "0xAA"
        }"#;
        let token: TokenItem = serde_json::from_str(json).expect("deserialize token");
        assert_eq!(token.usd_value, None);
        assert_eq!(token.is_core, None);
        assert!(!token.is_suspicious);
        assert!(!token.has_protocol());
    }

    #[test]
    fn test_protocol_detection() {
        let lp = TokenItem::new("uni-v2", "eth", "UNI-V2", "0xaa").with_protocol("uniswap2");
        assert!(lp.has_protocol());
        let empty = TokenItem::new("x", "eth", "X", "0xaa").with_protocol("");
        assert!(!empty.has_protocol());
    }
}
