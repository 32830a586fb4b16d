//! Business logic services module.

pub mod balance;
pub mod chain_info;
pub mod seeder;
pub mod smoke;

pub use balance::BalanceService;
pub use chain_info::check_chain;
pub use seeder::Seeder;
pub use smoke::{abi_report, sdk_smoke};
