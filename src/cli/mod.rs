use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use crate::application::{AppError, ErrorKind, LedgerService};
use crate::config::{DEFAULT_DATABASE, LedgerConfig};
use crate::domain::{Account, AccountNumber, format_cents, parse_cents};

mod menu;

pub use menu::run_menu;

/// Bankbook - single-operator account ledger
#[derive(Parser)]
#[command(name = "bankbook")]
#[command(about = "Open accounts, deposit and withdraw against a local SQLite ledger")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, env = "BANKBOOK_DB", default_value = DEFAULT_DATABASE)]
    pub database: PathBuf,

    /// How long to wait for a locked database file, in milliseconds
    #[arg(long, default_value_t = 5000)]
    pub busy_timeout_ms: u64,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Open a new account with a zero balance
    Open {
        /// Account holder name
        name: String,
    },

    /// Deposit money into an account
    Deposit {
        /// Account number
        account: AccountNumber,

        /// Amount to deposit (e.g., "50.00" or "50")
        amount: String,
    },

    /// Withdraw money from an account
    Withdraw {
        /// Account number
        account: AccountNumber,

        /// Amount to withdraw (e.g., "50.00" or "50")
        amount: String,
    },

    /// Show the balance of one account
    Balance {
        /// Account number
        account: AccountNumber,
    },

    /// List all accounts
    List,

    /// Export all accounts to CSV or JSON
    Export {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Interactive menu: create, deposit, withdraw, refresh, quit
    Menu,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl Cli {
    pub fn config(&self) -> LedgerConfig {
        LedgerConfig::new(&self.database)
            .with_busy_timeout(Duration::from_millis(self.busy_timeout_ms))
    }

    pub async fn run(self) -> Result<()> {
        let config = self.config();

        // A ledger that cannot be opened or migrated ends the process.
        let service = LedgerService::open(&config)
            .await
            .with_context(|| format!("Failed to open ledger {}", config.database.display()))?;

        let result = self.dispatch(&service).await;
        service.close().await;
        result
    }

    async fn dispatch(self, service: &LedgerService) -> Result<()> {
        match self.command {
            Commands::Init => {
                println!("Database initialized: {}", self.database.display());
            }

            Commands::Open { name } => {
                let account_number = service.open_account(&name).await?;
                println!("Opened account {} for {}", account_number, name.trim());
            }

            Commands::Deposit { account, amount } => {
                let amount_cents =
                    parse_cents(&amount).context("Invalid amount format. Use '50.00' or '50'")?;
                let balance = service.deposit(account, amount_cents).await?;
                println!(
                    "Deposited {} into account {}. Balance: {}",
                    format_cents(amount_cents),
                    account,
                    format_cents(balance)
                );
            }

            Commands::Withdraw { account, amount } => {
                let amount_cents =
                    parse_cents(&amount).context("Invalid amount format. Use '50.00' or '50'")?;
                let balance = service.withdraw(account, amount_cents).await?;
                println!(
                    "Withdrew {} from account {}. Balance: {}",
                    format_cents(amount_cents),
                    account,
                    format_cents(balance)
                );
            }

            Commands::Balance { account } => {
                let account = service.get_account(account).await?;
                println!(
                    "{} ({}): {}",
                    account.name,
                    account.account_number,
                    account.formatted_balance()
                );
            }

            Commands::List => {
                let accounts = service.snapshot().await?;
                let stdout = std::io::stdout();
                render_accounts(&mut stdout.lock(), &accounts)?;
            }

            Commands::Export { format, output } => {
                run_export_command(service, format, output.as_deref()).await?;
            }

            Commands::Menu => {
                let stdin = std::io::stdin();
                let stdout = std::io::stdout();
                run_menu(service, stdin.lock(), stdout.lock()).await?;
            }
        }

        Ok(())
    }
}

async fn run_export_command(
    service: &LedgerService,
    format: ExportFormat,
    output: Option<&std::path::Path>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::stdout;

    let exporter = Exporter::new(service);

    // Determine output writer
    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path).with_context(|| {
                format!("Failed to create output file: {}", path.display())
            })?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    let count = match format {
        ExportFormat::Csv => exporter.export_accounts_csv(writer).await?,
        ExportFormat::Json => exporter.export_accounts_json(writer).await?,
    };

    if output.is_some() {
        eprintln!("Exported {} accounts", count);
    }
    Ok(())
}

/// Render the account table.
pub fn render_accounts<W: Write>(out: &mut W, accounts: &[Account]) -> Result<()> {
    if accounts.is_empty() {
        writeln!(out, "No accounts found.")?;
        return Ok(());
    }

    writeln!(out, "{:>14} | {:<20} | {:>12}", "Account Number", "Name", "Balance")?;
    writeln!(out, "{}", "-".repeat(52))?;
    for account in accounts {
        writeln!(
            out,
            "{:>14} | {:<20} | {:>12}",
            account.account_number,
            account.name,
            account.formatted_balance()
        )?;
    }
    Ok(())
}

/// One-line message for a failed operation.
pub fn error_line(err: &AppError) -> String {
    match err.kind() {
        ErrorKind::Validation | ErrorKind::NotFound => err.to_string(),
        ErrorKind::InsufficientFunds => match err {
            AppError::InsufficientFunds {
                balance, requested, ..
            } => format!(
                "Insufficient funds: balance {}, requested {}",
                format_cents(*balance),
                format_cents(*requested)
            ),
            _ => err.to_string(),
        },
        ErrorKind::Storage => format!("Operation failed: {}", err),
    }
}
