//! Fold / unfold ranking of classified holdings
//!
//! A large portfolio keeps its long tail of small core holdings behind an
//! expand switch. The switch only activates when at least
//! `EXPAND_SWITCH_MIN_TAIL` core tokens sit below the threshold.

use std::cmp::Ordering;
use crate::core::portfolio::classifier::classify;
use crate::domain::entities::{TokenAssets, TokenItem};
use crate::domain::policies::LpTokenPolicy;
use crate::shared::constants::{
    EXPAND_SWITCH_MIN_CORE_TOKENS, EXPAND_SWITCH_MIN_TAIL, FOLD_THRESHOLD_CAP, FOLD_THRESHOLD_DIVISOR,
    MAX_UNFOLDED_TOKENS,
};
use crate::shared::utils::compare_value_desc;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FoldResult {
    pub unfolded: Vec<TokenItem>,
    pub folded: Vec<TokenItem>,
}

/// One percent of the core value, capped at 1000 USD
pub fn fold_threshold(total_core_value: f64) -> f64 {
    let total = if total_core_value.is_nan() { 0.0 } else { total_core_value };
    (total / FOLD_THRESHOLD_DIVISOR).min(FOLD_THRESHOLD_CAP)
}

/// Index of the first core token below the threshold, in the order given.
///
/// Core tokens arrive in raw list order, not value order.
pub fn threshold_index(core: &[TokenItem], threshold: f64) -> Option<usize> {
    core.iter().position(|token| token.usd_value_or_zero() < threshold)
}

pub fn has_expand_switch(core: &[TokenItem], threshold: f64) -> bool {
    let len = core.len();
    match threshold_index(core, threshold) {
        Some(index) => len >= EXPAND_SWITCH_MIN_CORE_TOKENS && index + EXPAND_SWITCH_MIN_TAIL <= len,
        None => false,
    }
}

/// 0 = core with value, 1 = non-core, 2 = core without value
fn fold_rank(token: &TokenItem) -> u8 {
    if token.is_core_token() {
        if token.usd_value_or_zero() > 0.0 {
            0
        } else {
            2
        }
    } else {
        1
    }
}

fn compare_folded(a: &TokenItem, b: &TokenItem) -> Ordering {
    fold_rank(a)
        .cmp(&fold_rank(b))
        .then_with(|| compare_value_desc(a.usd_value_or_zero(), b.usd_value_or_zero()))
}

pub fn fold(non_scam: &[TokenItem], core: &[TokenItem], total_core_value: f64) -> FoldResult {
    let threshold = fold_threshold(total_core_value);
    let expand_switch = has_expand_switch(core, threshold);

    let mut sorted = non_scam.to_vec();
    sorted.sort_by(|a, b| compare_value_desc(a.usd_value_or_zero(), b.usd_value_or_zero()));

    let (mut unfolded, folded): (Vec<TokenItem>, Vec<TokenItem>) = sorted.into_iter().partition(|token| {
        let should_unfold = !expand_switch || token.usd_value_or_zero() >= threshold;
        should_unfold && token.is_core_token()
    });

    let mut overflow = if unfolded.len() > MAX_UNFOLDED_TOKENS {
        unfolded.split_off(MAX_UNFOLDED_TOKENS)
    } else {
        Vec::new()
    };
    overflow.extend(folded);
    overflow.sort_by(compare_folded);

    FoldResult {
        unfolded,
        folded: overflow,
    }
}

/// Classify, fold, then apply the chain filter and LP visibility.
///
/// LP visibility never hides unfolded tokens.
pub fn build_assets<'a, I>(
    tokens: I,
    chain_server_id: Option<&str>,
    lp_token_enabled: bool,
    policy: &dyn LpTokenPolicy,
) -> TokenAssets
where
    I: IntoIterator<Item = &'a TokenItem>,
{
    let classification = classify(tokens);
    let FoldResult { unfolded, folded } = fold(
        &classification.non_scam,
        &classification.core,
        classification.total_core_value,
    );

    let on_chain = |token: &TokenItem| chain_server_id.map_or(true, |chain| token.chain == chain);
    let visible = |token: &TokenItem| on_chain(token) && policy.is_visible(token, lp_token_enabled);

    TokenAssets {
        un_fold_tokens: unfolded.into_iter().filter(|token| on_chain(token)).collect(),
        fold_tokens: folded.into_iter().filter(|token| visible(token)).collect(),
        scam_tokens: classification.scam.into_iter().filter(|token| visible(token)).collect(),
    }
}
