//! Ranked token lists for pickers: keyword search, perps and chain selectors

use std::cmp::Ordering;
use crate::domain::entities::TokenItem;
use crate::domain::policies::LpTokenPolicy;
use crate::shared::constants::{SCORE_EXACT_CORE, SCORE_EXACT_NON_CORE, SCORE_PARTIAL_CORE, SCORE_PARTIAL_NON_CORE};
use crate::shared::utils::compare_value_desc;

/// Core tokens first, then by `price * amount` descending
pub fn compare_usd_value_desc(a: &TokenItem, b: &TokenItem) -> Ordering {
    match (a.is_core_token(), b.is_core_token()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => compare_value_desc(a.nominal_value(), b.nominal_value()),
    }
}

pub fn sort_by_usd_value_desc(mut tokens: Vec<TokenItem>) -> Vec<TokenItem> {
    tokens.sort_by(compare_usd_value_desc);
    tokens
}

pub fn search_score(exact_match: bool, is_core: bool) -> u8 {
    match (exact_match, is_core) {
        (true, true) => SCORE_EXACT_CORE,
        (true, false) => SCORE_EXACT_NON_CORE,
        (false, true) => SCORE_PARTIAL_CORE,
        (false, false) => SCORE_PARTIAL_NON_CORE,
    }
}

struct SearchHit {
    score: u8,
    suspicious: bool,
    id_match: bool,
    symbol_match: bool,
    value: f64,
    token: TokenItem,
}

impl SearchHit {
    fn new(token: &TokenItem, keyword: &str) -> Option<Self> {
        let id = token.id.to_lowercase();
        let symbol = token.symbol.to_lowercase();
        let id_match = id.contains(keyword);
        let symbol_match = symbol.contains(keyword);
        if !id_match && !symbol_match {
            return None;
        }
        let exact_match = id == keyword || symbol == keyword;
        Some(Self {
            score: search_score(exact_match, token.is_core_token()),
            suspicious: token.is_suspicious,
            id_match,
            symbol_match,
            value: token.fallback_usd_value(),
            token: token.clone(),
        })
    }

    fn compare(&self, other: &Self) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then_with(|| self.suspicious.cmp(&other.suspicious))
            .then_with(|| other.id_match.cmp(&self.id_match))
            .then_with(|| other.symbol_match.cmp(&self.symbol_match))
            .then_with(|| compare_value_desc(self.value, other.value))
    }
}

/// Case-insensitive search over `id` and `symbol`.
///
/// Unverified tokens and non-core tokens without a protocol never match.
pub fn search_tokens<'a, I>(tokens: I, keyword: &str) -> Vec<TokenItem>
where
    I: IntoIterator<Item = &'a TokenItem>,
{
    let keyword = keyword.to_lowercase();
    if keyword.is_empty() {
        return Vec::new();
    }
    let mut hits: Vec<SearchHit> = tokens
        .into_iter()
        .filter(|token| token.is_verified != Some(false))
        .filter(|token| !(token.is_core == Some(false) && !token.has_protocol()))
        .filter_map(|token| SearchHit::new(token, &keyword))
        .collect();
    hits.sort_by(SearchHit::compare);
    hits.into_iter().map(|hit| hit.token).collect()
}

/// Picker list: keyword search when a keyword is given, otherwise all
/// visible tokens by value
pub fn select<'a, I>(
    tokens: I,
    keyword: Option<&str>,
    lp_token_enabled: bool,
    policy: &dyn LpTokenPolicy,
) -> Vec<TokenItem>
where
    I: IntoIterator<Item = &'a TokenItem>,
{
    match keyword.filter(|keyword| !keyword.is_empty()) {
        Some(keyword) => search_tokens(tokens, keyword),
        None if lp_token_enabled => sort_by_usd_value_desc(
            tokens
                .into_iter()
                .filter(|token| policy.is_visible(token, true))
                .cloned()
                .collect(),
        ),
        None => sort_by_usd_value_desc(
            tokens
                .into_iter()
                .filter(|token| policy.default_visible(token))
                .cloned()
                .collect(),
        ),
    }
}

/// Core tokens usable as perps margin, by value
pub fn select_perps<'a, I>(tokens: I) -> Vec<TokenItem>
where
    I: IntoIterator<Item = &'a TokenItem>,
{
    sort_by_usd_value_desc(tokens.into_iter().filter(|token| token.is_core_token()).cloned().collect())
}

/// Core tokens in holding order, used to build the chain selector
pub fn select_chain_tokens<'a, I>(tokens: I) -> Vec<TokenItem>
where
    I: IntoIterator<Item = &'a TokenItem>,
{
    tokens.into_iter().filter(|token| token.is_core_token()).cloned().collect()
}
