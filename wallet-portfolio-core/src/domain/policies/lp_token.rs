//! LP token visibility policy
//!
//! Liquidity-pool receipts are hidden from fold/scam groups and pickers unless
//! the user enabled LP tokens. The rule deciding what counts as an LP token is
//! product policy, so it sits behind a trait.

use crate::domain::entities::TokenItem;

pub trait LpTokenPolicy: Send + Sync {
    /// Whether the token is a liquidity-pool receipt
    fn is_lp_token(&self, token: &TokenItem) -> bool;

    /// Visibility of a token given the user's LP setting
    fn is_visible(&self, token: &TokenItem, lp_token_enabled: bool) -> bool {
        lp_token_enabled || !self.is_lp_token(token)
    }

    /// Visibility used by pickers when LP tokens are disabled
    fn default_visible(&self, token: &TokenItem) -> bool {
        self.is_visible(token, false)
    }
}

/// Treats any non-core token issued by a protocol as an LP token
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtocolLpTokenPolicy;

impl LpTokenPolicy for ProtocolLpTokenPolicy {
    fn is_lp_token(&self, token: &TokenItem) -> bool {
        token.has_protocol() && !token.is_core_token()
    }
}

/// Shows every token regardless of the LP setting
#[derive(Debug, Clone, Copy, Default)]
pub struct ShowAllLpTokenPolicy;

impl LpTokenPolicy for ShowAllLpTokenPolicy {
    fn is_lp_token(&self, _token: &TokenItem) -> bool {
        false
    }
}
