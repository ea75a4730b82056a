//! Domain repositories
//!
//! This module contains repository traits for data access
//! following Domain-Driven Design principles.

pub mod token_source;

// Re-export repositories
pub use token_source::*;
