//! Pure portfolio computations
//!
//! Classification, folding, selection and the per-kind view builders. Nothing
//! in here holds state.

pub mod classifier;
pub mod folder;
pub mod selector;
pub mod views;

pub use classifier::{classify, is_scam, Classification};
pub use folder::{build_assets, fold, FoldResult};
pub use selector::{search_tokens, select, select_chain_tokens, select_perps};
pub use views::*;
