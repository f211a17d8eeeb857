use crate::config::LedgerConfig;
use crate::domain::{normalize_name, Account, AccountNumber, Cents};
use crate::storage::Repository;

use super::AppError;

/// Application service providing the ledger operations.
/// This is the primary interface for any client (CLI, menu, tests).
///
/// The service owns its repository and caches nothing: every call re-reads
/// the store, so callers never see a stale balance.
pub struct LedgerService {
    repo: Repository,
}

impl LedgerService {
    /// Create a new ledger service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Open the database described by `config`, creating the file and the
    /// schema when missing.
    pub async fn open(config: &LedgerConfig) -> Result<Self, AppError> {
        let repo = Repository::init(config).await?;
        Ok(Self::new(repo))
    }

    /// Release the database connections.
    pub async fn close(&self) {
        self.repo.close().await;
    }

    // ========================
    // Mutations
    // ========================

    /// Open a new account with a zero balance.
    pub async fn open_account(&self, name: &str) -> Result<AccountNumber, AppError> {
        let Some(name) = normalize_name(name) else {
            tracing::warn!("rejected account with empty name");
            return Err(AppError::InvalidName(
                "name must not be empty".to_string(),
            ));
        };

        let account_number = self.repo.create_account(name).await?;
        tracing::info!(account_number, name, "opened account");
        Ok(account_number)
    }

    /// Deposit a positive amount and return the new balance.
    pub async fn deposit(
        &self,
        account_number: AccountNumber,
        amount_cents: Cents,
    ) -> Result<Cents, AppError> {
        Self::validate_amount(amount_cents)?;

        let balance = self
            .repo
            .adjust_balance(account_number, amount_cents)
            .await
            .inspect_err(|err| tracing::warn!(account_number, amount_cents, %err, "deposit rejected"))?;

        tracing::info!(account_number, amount_cents, balance, "deposit applied");
        Ok(balance)
    }

    /// Withdraw a positive amount and return the new balance.
    /// Fails with `InsufficientFunds` when the amount exceeds the balance.
    pub async fn withdraw(
        &self,
        account_number: AccountNumber,
        amount_cents: Cents,
    ) -> Result<Cents, AppError> {
        Self::validate_amount(amount_cents)?;

        let balance = self
            .repo
            .adjust_balance(account_number, -amount_cents)
            .await
            .inspect_err(|err| tracing::warn!(account_number, amount_cents, %err, "withdrawal rejected"))?;

        tracing::info!(account_number, amount_cents, balance, "withdrawal applied");
        Ok(balance)
    }

    // ========================
    // Reads
    // ========================

    /// Get an account by number.
    pub async fn get_account(&self, account_number: AccountNumber) -> Result<Account, AppError> {
        Ok(self.repo.get_account(account_number).await?)
    }

    /// Get the current balance of an account.
    pub async fn get_balance(&self, account_number: AccountNumber) -> Result<Cents, AppError> {
        Ok(self.repo.get_balance(account_number).await?)
    }

    /// All accounts ordered by account number. Each call queries afresh.
    pub async fn snapshot(&self) -> Result<Vec<Account>, AppError> {
        Ok(self.repo.list_accounts().await?)
    }

    /// Number of accounts in the ledger.
    pub async fn count_accounts(&self) -> Result<i64, AppError> {
        Ok(self.repo.count_accounts().await?)
    }

    fn validate_amount(amount_cents: Cents) -> Result<(), AppError> {
        if amount_cents <= 0 {
            return Err(AppError::InvalidAmount(
                "Amount must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
