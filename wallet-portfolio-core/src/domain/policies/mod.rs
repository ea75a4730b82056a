//! Domain policies
//!
//! Product rules that the core consults but does not own.

pub mod lp_token;

pub use lp_token::*;
