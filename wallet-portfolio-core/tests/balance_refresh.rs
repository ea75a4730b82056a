use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use wallet_portfolio_core::{
    build_portfolio_core, CoreConfig, PortfolioError, PortfolioResult, TokenItem, TokenSource,
};

/// In-memory token source keyed by address, then chain
struct FixtureSource {
    cached: HashMap<String, Vec<TokenItem>>,
    chains: HashMap<String, HashMap<String, PortfolioResult<Vec<TokenItem>>>>,
}

#[async_trait]
impl TokenSource for FixtureSource {
    async fn cached_tokens(&self, address: &str) -> PortfolioResult<Vec<TokenItem>> {
        Ok(self.cached.get(address).cloned().unwrap_or_default())
    }

    async fn used_chains(&self, address: &str) -> PortfolioResult<Vec<String>> {
        let mut chains: Vec<String> = self
            .chains
            .get(address)
            .map(|chains| chains.keys().cloned().collect())
            .unwrap_or_default();
        chains.sort();
        Ok(chains)
    }

    async fn chain_tokens(&self, address: &str, chain: &str) -> PortfolioResult<Vec<TokenItem>> {
        self.chains
            .get(address)
            .and_then(|chains| chains.get(chain))
            .cloned()
            .unwrap_or_else(|| Err(PortfolioError::source(format!("unknown chain {chain}"))))
    }
}

fn native(chain: &str, usd: f64) -> TokenItem {
    TokenItem::new(chain, chain, chain.to_uppercase(), "")
        .with_core(Some(true))
        .with_usd_value(Some(usd))
}

#[tokio::test]
async fn test_refresh_feeds_registered_views() {
    let core = build_portfolio_core(CoreConfig::default());
    let key = core.service.register_chain_selector(&["0xA1"]);

    let mut chains = HashMap::new();
    chains.insert("arb".to_string(), Ok(vec![native("arb", 20.0)]));
    chains.insert("eth".to_string(), Ok(vec![native("eth", 300.0)]));
    chains.insert("bsc".to_string(), Err(PortfolioError::source("rate limited")));
    let mut by_address = HashMap::new();
    by_address.insert("0xa1".to_string(), chains);

    let source = FixtureSource {
        cached: HashMap::new(),
        chains: by_address,
    };
    let refresher = core.refresher(Arc::new(source));
    refresher.refresh_address("0xA1").await.expect("refresh");

    let view = core.service.chain_selector(&key).expect("registered view");
    let ids: Vec<&str> = view.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["arb", "eth"]);
    assert!(view.iter().all(|t| t.owner_addr == "0xa1"));
    assert!(!core.store.loading_state("0xa1").all_loading);
}
