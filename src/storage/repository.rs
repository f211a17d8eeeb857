use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};

use crate::config::LedgerConfig;
use crate::domain::{normalize_name, Account, AccountNumber, Cents, MAX_BALANCE_CENTS};

use super::{AccountLocks, StoreError, MIGRATION_001_ACCOUNTS};

/// Repository for persisting and querying accounts.
///
/// Balances live in a `REAL` column but are always read back as whole cents
/// (`CAST(ROUND(balance * 100) AS INTEGER)`) and written as `cents / 100.0`,
/// so arithmetic happens on integers and no drift accumulates.
pub struct Repository {
    pool: SqlitePool,
    locks: AccountLocks,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            locks: AccountLocks::new(),
        }
    }

    /// Connect to the SQLite database described by `config`.
    /// Creates the database file if it doesn't exist.
    pub async fn connect(config: &LedgerConfig) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(&config.database)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(config.busy_timeout);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .with_context(|| {
                format!(
                    "Failed to connect to database {}",
                    config.database.display()
                )
            })?;

        tracing::debug!(database = %config.database.display(), "connected to ledger database");
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_ACCOUNTS)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;

        Ok(())
    }

    /// Initialize the database (connect + migrate).
    pub async fn init(config: &LedgerConfig) -> Result<Self> {
        let repo = Self::connect(config).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    /// Close every pooled connection. Pending writes are already committed.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    // ========================
    // Account operations
    // ========================

    /// Insert a new account with a zero balance and return its number.
    pub async fn create_account(&self, name: &str) -> Result<AccountNumber, StoreError> {
        let name = normalize_name(name).ok_or(StoreError::EmptyName)?;

        let row = sqlx::query(
            r#"
            INSERT INTO accounts (name, balance)
            VALUES (?, 0.0)
            RETURNING accountNumber
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .context("Failed to create account")?;

        let account_number: AccountNumber = row.get("accountNumber");
        tracing::debug!(account_number, "inserted account row");
        Ok(account_number)
    }

    /// Get an account by number.
    pub async fn get_account(&self, account_number: AccountNumber) -> Result<Account, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT accountNumber, name, CAST(ROUND(balance * 100) AS INTEGER) AS balance_cents
            FROM accounts
            WHERE accountNumber = ?
            "#,
        )
        .bind(account_number)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch account")?;

        match row {
            Some(row) => Ok(Self::row_to_account(&row)),
            None => Err(StoreError::NotFound(account_number)),
        }
    }

    /// Get the current balance of an account.
    pub async fn get_balance(&self, account_number: AccountNumber) -> Result<Cents, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT CAST(ROUND(balance * 100) AS INTEGER) AS balance_cents
            FROM accounts
            WHERE accountNumber = ?
            "#,
        )
        .bind(account_number)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch balance")?;

        match row {
            Some(row) => Ok(row.get("balance_cents")),
            None => Err(StoreError::NotFound(account_number)),
        }
    }

    /// List all accounts, ordered by account number.
    pub async fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT accountNumber, name, CAST(ROUND(balance * 100) AS INTEGER) AS balance_cents
            FROM accounts
            ORDER BY accountNumber
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list accounts")?;

        Ok(rows.iter().map(Self::row_to_account).collect())
    }

    /// Count the accounts in the ledger.
    pub async fn count_accounts(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query("SELECT COUNT(*) AS count FROM accounts")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count accounts")?
            .get("count");

        Ok(count)
    }

    /// Apply `delta` to an account balance and return the new balance.
    ///
    /// The check and the write are one conditional `UPDATE`, run inside a
    /// transaction while holding the account's row lock. A rejected
    /// adjustment leaves the row untouched.
    pub async fn adjust_balance(
        &self,
        account_number: AccountNumber,
        delta: Cents,
    ) -> Result<Cents, StoreError> {
        let row_lock = self.locks.lock(account_number).await;

        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        let updated = sqlx::query(
            r#"
            UPDATE accounts
            SET balance = (CAST(ROUND(balance * 100) AS INTEGER) + ?) / 100.0
            WHERE accountNumber = ?
              AND CAST(ROUND(balance * 100) AS INTEGER) + ? BETWEEN 0 AND ?
            RETURNING CAST(ROUND(balance * 100) AS INTEGER) AS balance_cents
            "#,
        )
        .bind(delta)
        .bind(account_number)
        .bind(delta)
        .bind(MAX_BALANCE_CENTS)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to adjust balance")?;

        let Some(row) = updated else {
            let current = sqlx::query(
                r#"
                SELECT CAST(ROUND(balance * 100) AS INTEGER) AS balance_cents
                FROM accounts
                WHERE accountNumber = ?
                "#,
            )
            .bind(account_number)
            .fetch_optional(&mut *tx)
            .await
            .context("Failed to fetch balance")?;

            // Dropping `tx` rolls back; nothing was written.
            let Some(row) = current else {
                drop(tx);
                drop(row_lock);
                // Unknown numbers must not leave entries in the lock table.
                self.locks.forget(account_number);
                return Err(StoreError::NotFound(account_number));
            };
            return Err(Self::rejection(
                account_number,
                row.get("balance_cents"),
                delta,
            ));
        };

        let balance: Cents = row.get("balance_cents");
        tx.commit()
            .await
            .context("Failed to commit balance adjustment")?;
        drop(row_lock);

        tracing::debug!(account_number, delta, balance, "adjusted balance");
        Ok(balance)
    }

    /// Classify why a conditional update matched no row of an existing account.
    fn rejection(account_number: AccountNumber, balance: Cents, delta: Cents) -> StoreError {
        match balance.checked_add(delta) {
            Some(next) if next < 0 => StoreError::InsufficientFunds {
                account_number,
                balance,
                requested: delta.saturating_neg(),
            },
            _ => StoreError::BalanceOverflow {
                account_number,
                balance,
                delta,
            },
        }
    }

    fn row_to_account(row: &SqliteRow) -> Account {
        Account {
            account_number: row.get("accountNumber"),
            name: row.get("name"),
            balance: row.get("balance_cents"),
        }
    }
}
