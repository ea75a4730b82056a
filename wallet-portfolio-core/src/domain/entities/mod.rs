//! Domain entities and value objects
//!
//! This module contains the core domain entities and value objects
//! that represent the business concepts in the portfolio system.

pub mod token;
pub mod params;
pub mod views;

// Re-export entities
pub use token::*;
pub use params::*;
pub use views::*;
