//! Type definitions module.
//!
//! Contains shared types used across the application.

pub mod report;
pub mod seed;
pub mod token;
pub mod tx;

pub use report::*;
pub use seed::*;
pub use token::*;
pub use tx::*;
