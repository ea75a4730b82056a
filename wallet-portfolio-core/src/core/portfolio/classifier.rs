//! Scam / core classification of raw token lists

use crate::domain::entities::TokenItem;

/// Partition of a token list; every list keeps input order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    pub scam: Vec<TokenItem>,
    pub non_scam: Vec<TokenItem>,
    pub core: Vec<TokenItem>,
    pub total_core_value: f64,
}

/// Whether a token is suppressed from default views.
///
/// Core tokens with no USD value are exempt from the zero-value rule.
pub fn is_scam(token: &TokenItem) -> bool {
    let usd_value = token.usd_value_or_zero();
    let is_zero_core_exemption = token.is_core_token() && usd_value == 0.0;
    token.is_verified == Some(false)
        || (usd_value == 0.0 && !is_zero_core_exemption)
        || token.is_suspicious
}

pub fn classify<'a, I>(tokens: I) -> Classification
where
    I: IntoIterator<Item = &'a TokenItem>,
{
    let mut classification = Classification::default();
    for token in tokens {
        let scam = is_scam(token);
        if scam {
            classification.scam.push(token.clone());
        } else {
            classification.non_scam.push(token.clone());
        }
        if !scam && token.is_core_token() {
            classification.core.push(token.clone());
            classification.total_core_value += token.usd_value_or_zero();
        }
    }
    classification
}
