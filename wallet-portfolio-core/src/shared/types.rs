use serde::{Deserialize, Serialize};
use std::fmt;

// Basic types for portfolio views
pub type Address = String;
pub type ChainServerId = String;
pub type CacheKey = String;

/// The five derived view shapes kept by the portfolio cache
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    MultiAssets,
    SingleAssets,
    TokenSelect,
    PerpsTokenSelect,
    ChainSelector,
}

impl ViewKind {
    pub const ALL: [ViewKind; 5] = [
        ViewKind::MultiAssets,
        ViewKind::SingleAssets,
        ViewKind::TokenSelect,
        ViewKind::PerpsTokenSelect,
        ViewKind::ChainSelector,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ViewKind::MultiAssets => "multi_assets",
            ViewKind::SingleAssets => "single_assets",
            ViewKind::TokenSelect => "token_select",
            ViewKind::PerpsTokenSelect => "perps_token_select",
            ViewKind::ChainSelector => "chain_selector",
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Result types for better error handling
pub type PortfolioResult<T> = Result<T, crate::shared::error::PortfolioError>;
