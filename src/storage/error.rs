use thiserror::Error;

use crate::domain::{format_cents, AccountNumber, Cents};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Account name must not be empty")]
    EmptyName,

    #[error("Account not found: {0}")]
    NotFound(AccountNumber),

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

    #[error("Balance of account {account_number} would exceed the ledger maximum")]
    BalanceOverflow {
        account_number: AccountNumber,
        balance: Cents,
        delta: Cents,
    },

    #[error("Storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}
