use thiserror::Error;

use crate::domain::{format_cents, AccountNumber, Cents};
use crate::storage::StoreError;

/// Broad category of a failed operation, as shown to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    InsufficientFunds,
    Storage,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid account name: {0}")]
    InvalidName(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Account not found: {0}")]
    AccountNotFound(AccountNumber),

    #[error(
        "Insufficient funds in account {account_number}: balance {}, requested {}",
        format_cents(*.balance),
        format_cents(*.requested)
    )]
    InsufficientFunds {
        account_number: AccountNumber,
        balance: Cents,
        requested: Cents,
    },

    #[error("Database error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::InvalidName(_) | AppError::InvalidAmount(_) => ErrorKind::Validation,
            AppError::AccountNotFound(_) => ErrorKind::NotFound,
            AppError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            AppError::Storage(_) => ErrorKind::Storage,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::EmptyName => AppError::InvalidName("name must not be empty".to_string()),
            StoreError::NotFound(account_number) => AppError::AccountNotFound(account_number),
            StoreError::InsufficientFunds {
                account_number,
                balance,
                requested,
            } => AppError::InsufficientFunds {
                account_number,
                balance,
                requested,
            },
            StoreError::BalanceOverflow { .. } => AppError::InvalidAmount(
                "resulting balance would exceed the ledger maximum".to_string(),
            ),
            StoreError::Storage(err) => AppError::Storage(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_map_to_kinds() {
        let cases = [
            (StoreError::EmptyName, ErrorKind::Validation),
            (StoreError::NotFound(9), ErrorKind::NotFound),
            (
                StoreError::InsufficientFunds {
                    account_number: 1,
                    balance: 7000,
                    requested: 100_000,
                },
                ErrorKind::InsufficientFunds,
            ),
            (
                StoreError::BalanceOverflow {
                    account_number: 1,
                    balance: 1,
                    delta: i64::MAX,
                },
                ErrorKind::Validation,
            ),
            (
                StoreError::Storage(anyhow::anyhow!("disk I/O error")),
                ErrorKind::Storage,
            ),
        ];

        for (store_err, kind) in cases {
            assert_eq!(AppError::from(store_err).kind(), kind);
        }
    }

    #[test]
    fn test_not_found_message_names_account() {
        let err = AppError::from(StoreError::NotFound(42));
        assert_eq!(err.to_string(), "Account not found: 42");
    }

    #[test]
    fn test_insufficient_funds_message_shows_money() {
        let err = AppError::from(StoreError::InsufficientFunds {
            account_number: 1,
            balance: 7000,
            requested: 100_000,
        });
        assert_eq!(
            err.to_string(),
            "Insufficient funds in account 1: balance 70.00, requested 1000.00"
        );
    }
}
