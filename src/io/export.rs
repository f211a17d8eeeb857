use anyhow::Result;
use serde::Serialize;
use std::io::Write;

use crate::application::LedgerService;
use crate::domain::{Account, AccountNumber, format_cents};

/// One exported ledger row. Balances are decimal strings so no consumer
/// ever parses them as a binary float.
#[derive(Debug, Clone, Serialize)]
pub struct AccountRecord {
    pub account_number: AccountNumber,
    pub name: String,
    pub balance: String,
}

impl From<&Account> for AccountRecord {
    fn from(account: &Account) -> Self {
        Self {
            account_number: account.account_number,
            name: account.name.clone(),
            balance: format_cents(account.balance),
        }
    }
}

/// Exporter for converting a ledger snapshot to CSV or JSON
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Export all accounts to CSV format
    pub async fn export_accounts_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let accounts = self.service.snapshot().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        // Header comes from the AccountRecord field names
        for account in &accounts {
            csv_writer.serialize(AccountRecord::from(account))?;
        }
        if accounts.is_empty() {
            csv_writer.write_record(["account_number", "name", "balance"])?;
        }

        csv_writer.flush()?;
        Ok(accounts.len())
    }

    /// Export all accounts to JSON format
    pub async fn export_accounts_json<W: Write>(&self, mut writer: W) -> Result<usize> {
        let accounts = self.service.snapshot().await?;
        let records: Vec<AccountRecord> = accounts.iter().map(AccountRecord::from).collect();

        serde_json::to_writer_pretty(&mut writer, &records)?;
        writeln!(writer)?;
        Ok(records.len())
    }
}
