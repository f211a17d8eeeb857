// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use bankbook::application::LedgerService;
use bankbook::config::LedgerConfig;
use std::path::PathBuf;
use tempfile::TempDir;

/// Config pointing at a fresh database file inside `temp_dir`
pub fn test_config(temp_dir: &TempDir) -> LedgerConfig {
    LedgerConfig::new(db_path(temp_dir))
}

pub fn db_path(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("test.db")
}

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let service = LedgerService::open(&test_config(&temp_dir)).await?;
    Ok((service, temp_dir))
}

/// Test fixture: open an account and fund it
pub async fn funded_account(service: &LedgerService, name: &str, cents: i64) -> Result<i64> {
    let account_number = service.open_account(name).await?;
    if cents > 0 {
        service.deposit(account_number, cents).await?;
    }
    Ok(account_number)
}

/// Rename the accounts table behind the service's back, through a separate
/// connection, so that queries against it fail at runtime.
pub async fn rename_accounts_table(temp_dir: &TempDir, from: &str, to: &str) -> Result<()> {
    let url = format!("sqlite:{}", db_path(temp_dir).display());
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await?;
    sqlx::query(&format!("ALTER TABLE {} RENAME TO {}", from, to))
        .execute(&pool)
        .await?;
    pool.close().await;
    Ok(())
}
