//! Computed view shapes handed to UI consumers

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use crate::domain::entities::token::TokenItem;

/// Holdings split into always-visible, expandable and suppressed groups
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAssets {
    pub un_fold_tokens: Vec<TokenItem>,
    pub fold_tokens: Vec<TokenItem>,
    pub scam_tokens: Vec<TokenItem>,
}

impl TokenAssets {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.un_fold_tokens.is_empty() && self.fold_tokens.is_empty() && self.scam_tokens.is_empty()
    }
}

pub type TokenList = Vec<TokenItem>;

/// Read-only view returned by a kind-erased lookup
#[derive(Debug, Clone, PartialEq)]
pub enum ComputedView {
    Assets(Arc<TokenAssets>),
    Tokens(Arc<TokenList>),
}

impl ComputedView {
    pub fn as_assets(&self) -> Option<&TokenAssets> {
        match self {
            ComputedView::Assets(assets) => Some(assets),
            ComputedView::Tokens(_) => None,
        }
    }

    pub fn as_tokens(&self) -> Option<&[TokenItem]> {
        match self {
            ComputedView::Tokens(tokens) => Some(tokens),
            ComputedView::Assets(_) => None,
        }
    }

    pub fn to_json(&self) -> Result<String, crate::shared::error::PortfolioError> {
        let json = match self {
            ComputedView::Assets(assets) => serde_json::to_string(assets.as_ref())?,
            ComputedView::Tokens(tokens) => serde_json::to_string(tokens.as_ref())?,
        };
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_assets_serialize_camel_case() {
        let json = serde_json::to_string(&TokenAssets::empty()).expect("serialize assets");
        assert_eq!(json, r#"{"unFoldTokens":[],"foldTokens":[],"scamTokens":[]}"#);
    }

    #[test]
    fn test_computed_view_accessors() {
        let view = ComputedView::Tokens(Arc::new(vec![TokenItem::new("eth", "eth", "ETH", "0xaa")]));
        assert_eq!(view.as_tokens().map(<[TokenItem]>::len), Some(1));
        assert!(view.as_assets().is_none());
        assert!(view.to_json().expect("json").starts_with('['));
    }
}
