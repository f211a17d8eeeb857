use anyhow::Result;
use std::io::{BufRead, Write};

use crate::application::LedgerService;
use crate::domain::{AccountNumber, Cents, format_cents, parse_cents};

use super::{error_line, render_accounts};

const OPTIONS: [&str; 5] = [
    "Create Account",
    "Deposit",
    "Withdraw",
    "Refresh Table",
    "Quit",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    CreateAccount,
    Deposit,
    Withdraw,
    Refresh,
    Quit,
}

impl MenuChoice {
    fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "1" | "c" | "create" => Some(MenuChoice::CreateAccount),
            "2" | "d" | "deposit" => Some(MenuChoice::Deposit),
            "3" | "w" | "withdraw" => Some(MenuChoice::Withdraw),
            "4" | "r" | "refresh" | "" => Some(MenuChoice::Refresh),
            "5" | "q" | "quit" | "exit" => Some(MenuChoice::Quit),
            _ => None,
        }
    }
}

/// Interactive line-oriented menu over `input` and `output`.
///
/// Every failure is reported as a single line and the loop continues; only
/// I/O errors on the terminal itself end it. End of input behaves like Quit.
pub async fn run_menu<R: BufRead, W: Write>(
    service: &LedgerService,
    mut input: R,
    mut output: W,
) -> Result<()> {
    loop {
        let accounts = service.snapshot().await;
        writeln!(output)?;
        match accounts {
            Ok(accounts) => {
                render_accounts(&mut output, &accounts)?;
                match service.count_accounts().await {
                    Ok(count) => writeln!(output, "Accounts on file: {}", count)?,
                    Err(err) => writeln!(output, "{}", error_line(&err))?,
                }
            }
            Err(err) => writeln!(output, "{}", error_line(&err))?,
        }

        writeln!(output)?;
        for (index, option) in OPTIONS.iter().enumerate() {
            writeln!(output, "  {}. {}", index + 1, option)?;
        }

        let Some(line) = prompt(&mut input, &mut output, "Select an option: ")? else {
            return Ok(());
        };

        let message = match MenuChoice::parse(&line) {
            Some(MenuChoice::Quit) => return Ok(()),
            Some(MenuChoice::Refresh) => continue,
            Some(MenuChoice::CreateAccount) => {
                let Some(name) = prompt(&mut input, &mut output, "Enter name: ")? else {
                    return Ok(());
                };
                match service.open_account(&name).await {
                    Ok(account_number) => {
                        format!("Account {} created successfully.", account_number)
                    }
                    Err(err) => error_line(&err),
                }
            }
            Some(choice @ (MenuChoice::Deposit | MenuChoice::Withdraw)) => {
                match read_transaction(&mut input, &mut output, choice)? {
                    None => return Ok(()),
                    Some(Err(message)) => message,
                    Some(Ok((account_number, amount_cents))) => {
                        let result = if choice == MenuChoice::Deposit {
                            service.deposit(account_number, amount_cents).await
                        } else {
                            service.withdraw(account_number, amount_cents).await
                        };
                        match result {
                            Ok(balance) if choice == MenuChoice::Deposit => format!(
                                "Deposit successful. Balance: {}",
                                format_cents(balance)
                            ),
                            Ok(balance) => format!(
                                "Withdrawal successful. Balance: {}",
                                format_cents(balance)
                            ),
                            Err(err) => error_line(&err),
                        }
                    }
                }
            }
            None => format!("Unknown option '{}'.", line.trim()),
        };

        writeln!(output, "{}", message)?;
    }
}

/// Ask for an account number and an amount.
/// `None` means input ended; `Some(Err(_))` carries a message for bad text.
fn read_transaction<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    choice: MenuChoice,
) -> Result<Option<std::result::Result<(AccountNumber, Cents), String>>> {
    let Some(account_text) = prompt(input, output, "Account number: ")? else {
        return Ok(None);
    };
    let label = if choice == MenuChoice::Deposit {
        "Deposit amount: "
    } else {
        "Withdraw amount: "
    };
    let Some(amount_text) = prompt(input, output, label)? else {
        return Ok(None);
    };

    let Ok(account_number) = account_text.trim().parse::<AccountNumber>() else {
        return Ok(Some(Err(format!(
            "Invalid account number '{}'.",
            account_text.trim()
        ))));
    };

    match parse_cents(&amount_text) {
        Ok(amount_cents) => Ok(Some(Ok((account_number, amount_cents)))),
        Err(err) => Ok(Some(Err(format!(
            "Invalid amount '{}': {}.",
            amount_text.trim(),
            err
        )))),
    }
}

/// Print `label`, then read one line. Returns `None` at end of input.
fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> Result<Option<String>> {
    write!(output, "{}", label)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_choice_parse() {
        assert_eq!(MenuChoice::parse("1"), Some(MenuChoice::CreateAccount));
        assert_eq!(MenuChoice::parse(" Deposit "), Some(MenuChoice::Deposit));
        assert_eq!(MenuChoice::parse("w"), Some(MenuChoice::Withdraw));
        assert_eq!(MenuChoice::parse(""), Some(MenuChoice::Refresh));
        assert_eq!(MenuChoice::parse("QUIT"), Some(MenuChoice::Quit));
        assert_eq!(MenuChoice::parse("9"), None);
    }

    #[test]
    fn test_prompt_reads_until_eof() {
        let mut input = "Alice\r\n".as_bytes();
        let mut output = Vec::new();

        let first = prompt(&mut input, &mut output, "Enter name: ").unwrap();
        assert_eq!(first.as_deref(), Some("Alice"));

        let second = prompt(&mut input, &mut output, "Enter name: ").unwrap();
        assert_eq!(second, None);
        assert_eq!(String::from_utf8(output).unwrap(), "Enter name: Enter name: ");
    }

    #[test]
    fn test_read_transaction_reports_bad_text() {
        let mut output = Vec::new();

        let mut input = "abc\n10\n".as_bytes();
        let parsed = read_transaction(&mut input, &mut output, MenuChoice::Deposit).unwrap();
        assert!(matches!(parsed, Some(Err(ref msg)) if msg.contains("Invalid account number")));

        let mut input = "1\nten\n".as_bytes();
        let parsed = read_transaction(&mut input, &mut output, MenuChoice::Withdraw).unwrap();
        assert!(matches!(parsed, Some(Err(ref msg)) if msg.contains("Invalid amount")));

        let mut input = "2\n12.50\n".as_bytes();
        let parsed = read_transaction(&mut input, &mut output, MenuChoice::Deposit).unwrap();
        assert_eq!(parsed, Some(Ok((2, 1250))));
    }
}
