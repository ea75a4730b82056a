use std::collections::HashMap;
use std::sync::Arc;
use wallet_portfolio_core::{
    build_portfolio_core, CoreConfig, PortfolioCacheService, ProtocolLpTokenPolicy, RawBalanceStore, TokenItem,
    TokenSnapshot, ViewKind,
};

fn core_token(id: &str, usd: f64) -> TokenItem {
    TokenItem::new(id, "eth", id.to_uppercase(), "0xa1")
        .with_core(Some(true))
        .with_usd_value(Some(usd))
}

fn service() -> Arc<PortfolioCacheService> {
    PortfolioCacheService::new(Arc::new(RawBalanceStore::new()), Arc::new(ProtocolLpTokenPolicy))
}

fn ids(tokens: &[TokenItem]) -> Vec<&str> {
    tokens.iter().map(|t| t.id.as_str()).collect()
}

#[test]
fn test_end_to_end_fold_scenario() {
    let core = build_portfolio_core(CoreConfig::default());
    let key = core.service.register_multi_assets(&["0xA1"], None, false);

    let mut tokens: Vec<TokenItem> = (0..12).map(|i| core_token(&format!("big{i}"), 790.0)).collect();
    tokens.push(core_token("small", 50.0));
    tokens.push(core_token("mid", 150.0));
    tokens.push(core_token("upper_a", 160.0));
    tokens.push(core_token("upper_b", 160.0));
    tokens.push(core_token("dust", 0.0));
    tokens.push(
        TokenItem::new("meme", "eth", "MEME", "0xa1")
            .with_core(Some(false))
            .with_usd_value(Some(30.0)),
    );
    core.store.set_address_tokens("0xA1", tokens);

    let assets = core.service.multi_assets(&key).expect("registered view");
    assert_eq!(assets.un_fold_tokens.len(), 15);
    assert!(assets.un_fold_tokens.iter().all(|t| t.usd_value_or_zero() >= 100.0));
    assert_eq!(ids(&assets.fold_tokens), vec!["small", "meme", "dust"]);
    assert!(assets.scam_tokens.is_empty());

    // repeated registration yields the same view
    let again = core.service.register_multi_assets(&["0xa1"], None, false);
    assert_eq!(again, key);
    assert_eq!(*core.service.multi_assets(&again).expect("registered view"), *assets);
}

#[test]
fn test_key_normalization_across_case_and_order() {
    let service = service();
    let first = service.register_multi_assets(&["0xAA", "0xBB"], Some("eth"), true);
    let second = service.register_multi_assets(&["0xbb", "0xaa"], Some("eth"), true);
    assert_eq!(first, second);
}

#[test]
fn test_lru_bound_and_evicted_lookup() {
    let service = service();
    let keys: Vec<String> = (0..11)
        .map(|i| service.register_single_assets(&format!("0x{i:02}"), None, false))
        .collect();

    assert_eq!(service.registered_keys(ViewKind::SingleAssets).len(), 10);
    assert!(service.get_view(ViewKind::SingleAssets, &keys[0]).is_none());
    assert!(service.get_view(ViewKind::SingleAssets, &keys[10]).is_some());
    service.check_invariants().expect("invariants hold");
}

#[test]
fn test_recency_refresh_survives_one_more_insertion() {
    let service = service();
    let keys: Vec<String> = (0..10)
        .map(|i| service.register_chain_selector(&[format!("0x{i:02}")]))
        .collect();

    // touch the oldest key, then insert a new one
    service.register_chain_selector(&["0x00"]);
    service.register_chain_selector(&["0xnew"]);

    assert!(service.chain_selector(&keys[0]).is_some());
    assert!(service.chain_selector(&keys[1]).is_none());
}

#[test]
fn test_invalidation_keeps_registries_consistent() {
    let service = service();
    service.register_multi_assets(&["0xa1"], None, false);
    service.register_single_assets("0xa1", Some("eth"), true);
    service.register_token_select(&["0xa1"], None, Some("BIG"), false);
    service.register_perps_token_select(Some("0xa1"));
    service.register_chain_selector(&["0xa1"]);

    for round in 0..3 {
        let tokens = (0..round + 1).map(|i| core_token(&format!("big{i}"), 790.0)).collect();
        service.store().set_address_tokens("0xa1", tokens);
        service.check_invariants().expect("invariants hold");
    }

    for kind in ViewKind::ALL {
        for key in service.registered_keys(kind) {
            assert!(service.get_view(kind, &key).is_some(), "{kind} view missing for {key}");
        }
    }
    let key = service.register_token_select(&["0xA1"], None, Some("big"), false);
    assert_eq!(service.token_select(&key).expect("registered view").len(), 3);
}

#[test]
fn test_stale_snapshot_does_not_overwrite_newer_views() {
    let service = service();
    let key = service.register_perps_token_select(Some("0xa1")).expect("perps key");
    service.store().set_address_tokens("0xa1", vec![core_token("eth", 100.0)]);
    service.store().set_address_tokens("0xa1", vec![core_token("eth", 100.0), core_token("dai", 5.0)]);

    let mut lists = HashMap::new();
    lists.insert("0xa1".to_string(), Vec::new());
    service.on_raw_data_changed(&TokenSnapshot::from_lists(1, lists));

    assert_eq!(service.perps_token_select_or_empty(Some(key.as_str())).len(), 2);
}
