mod error;
mod locks;
mod repository;

pub use error::*;
pub use locks::*;
pub use repository::*;

/// SQL migration for the accounts table
pub const MIGRATION_001_ACCOUNTS: &str = include_str!("migrations/001_accounts.sql");
