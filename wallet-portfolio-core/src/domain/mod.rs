//! Domain layer - entities, repositories, and policies
//!
//! This module contains the domain logic and business rules for the portfolio system.
//! It follows Domain-Driven Design principles with clear separation of concerns.

pub mod entities;
pub mod repositories;
pub mod policies;

// Re-export domain components
pub use entities::*;
pub use repositories::*;
pub use policies::*;
