//! Smart contract bindings.

pub mod weth;

pub use weth::{Weth, IWETH};
