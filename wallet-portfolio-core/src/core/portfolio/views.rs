//! Compute functions for the five view kinds.
//!
//! Each function reads one immutable snapshot and returns a fresh view; the
//! registries decide when to call them.

use crate::core::portfolio::folder::build_assets;
use crate::core::portfolio::selector::{select, select_chain_tokens, select_perps};
use crate::core::store::TokenSnapshot;
use crate::domain::entities::{
    ChainSelectorParams, MultiAssetsParams, PerpsTokenSelectParams, SingleAssetsParams, TokenAssets, TokenList,
    TokenSelectParams,
};
use crate::domain::policies::LpTokenPolicy;

pub fn compute_multi_assets(
    snapshot: &TokenSnapshot,
    params: &MultiAssetsParams,
    policy: &dyn LpTokenPolicy,
) -> TokenAssets {
    if params.addresses.is_empty() {
        return TokenAssets::empty();
    }
    build_assets(
        snapshot.tokens_of(&params.addresses),
        params.chain_server_id.as_deref(),
        params.lp_token_enabled,
        policy,
    )
}

pub fn compute_single_assets(
    snapshot: &TokenSnapshot,
    params: &SingleAssetsParams,
    policy: &dyn LpTokenPolicy,
) -> TokenAssets {
    if params.address.is_empty() {
        return TokenAssets::empty();
    }
    build_assets(
        snapshot.tokens_for(&params.address),
        params.chain_server_id.as_deref(),
        params.lp_token_enabled,
        policy,
    )
}

pub fn compute_token_select(
    snapshot: &TokenSnapshot,
    params: &TokenSelectParams,
    policy: &dyn LpTokenPolicy,
) -> TokenList {
    if params.addresses.is_empty() {
        return TokenList::new();
    }
    let selected = select(
        snapshot.tokens_of(&params.addresses),
        params.keyword.as_deref(),
        params.lp_token_enabled,
        policy,
    );
    match params.chain_server_id.as_deref() {
        Some(chain) => selected.into_iter().filter(|token| token.chain == chain).collect(),
        None => selected,
    }
}

pub fn compute_perps_token_select(snapshot: &TokenSnapshot, params: &PerpsTokenSelectParams) -> TokenList {
    select_perps(snapshot.tokens_for(&params.address))
}

pub fn compute_chain_selector(snapshot: &TokenSnapshot, params: &ChainSelectorParams) -> TokenList {
    if params.addresses.is_empty() {
        return TokenList::new();
    }
    select_chain_tokens(snapshot.tokens_of(&params.addresses))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::TokenItem;
    use crate::domain::policies::ProtocolLpTokenPolicy;
    use std::collections::HashMap;

    fn snapshot() -> TokenSnapshot {
        let mut lists = HashMap::new();
        lists.insert(
            "0xaa".to_string(),
            vec![
                TokenItem::new("eth", "eth", "ETH", "0xaa").with_core(Some(true)).with_balance(1.0, 2000.0),
                TokenItem::new("usdc", "arb", "USDC", "0xaa").with_core(Some(true)).with_balance(10.0, 1.0),
            ],
        );
        lists.insert(
            "0xbb".to_string(),
            vec![TokenItem::new("eth", "eth", "ETH", "0xbb").with_core(Some(true)).with_balance(2.0, 2000.0)],
        );
        TokenSnapshot::from_lists(1, lists)
    }

    #[test]
    fn test_multi_assets_aggregates_addresses() {
        let params = MultiAssetsParams::new(&["0xBB", "0xAA"], None, false);
        let assets = compute_multi_assets(&snapshot(), &params, &ProtocolLpTokenPolicy);
        assert_eq!(assets.un_fold_tokens.len(), 3);
        assert_eq!(assets.un_fold_tokens[0].owner_addr, "0xbb");
    }

    #[test]
    fn test_empty_address_sets_yield_empty_views() {
        let snapshot = snapshot();
        let empty: [&str; 0] = [];
        assert!(compute_multi_assets(&snapshot, &MultiAssetsParams::new(&empty, None, false), &ProtocolLpTokenPolicy)
            .is_empty());
        assert!(compute_token_select(
            &snapshot,
            &TokenSelectParams::new(&empty, None, None, false),
            &ProtocolLpTokenPolicy
        )
        .is_empty());
        assert!(compute_chain_selector(&snapshot, &ChainSelectorParams::new(&empty)).is_empty());
    }

    #[test]
    fn test_unknown_address_yields_empty_view() {
        let params = SingleAssetsParams::new("0xcc", None, false);
        assert!(compute_single_assets(&snapshot(), &params, &ProtocolLpTokenPolicy).is_empty());
    }

    #[test]
    fn test_token_select_chain_filter() {
        let params = TokenSelectParams::new(&["0xaa"], Some("arb"), None, false);
        let tokens = compute_token_select(&snapshot(), &params, &ProtocolLpTokenPolicy);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].id, "usdc");
    }

    #[test]
    fn test_perps_select_orders_by_value() {
        let params = PerpsTokenSelectParams::new(Some("0xAA")).expect("params");
        let tokens = compute_perps_token_select(&snapshot(), &params);
        assert_eq!(tokens.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(), vec!["eth", "usdc"]);
    }
}
