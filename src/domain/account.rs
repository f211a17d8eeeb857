use serde::{Deserialize, Serialize};

use super::{Cents, format_cents};

/// Store-assigned identifier of an account. Monotonic and never reused.
pub type AccountNumber = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub account_number: AccountNumber,
    pub name: String,
    pub balance: Cents,
}

impl Account {
    pub fn new(account_number: AccountNumber, name: impl Into<String>, balance: Cents) -> Self {
        Self {
            account_number,
            name: name.into(),
            balance,
        }
    }

    /// Balance formatted as a two-decimal string, e.g. "70.00".
    pub fn formatted_balance(&self) -> String {
        format_cents(self.balance)
    }
}

/// Normalize an account name for storage.
/// Returns `None` when nothing but whitespace is left.
pub fn normalize_name(name: &str) -> Option<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("Alice"), Some("Alice"));
        assert_eq!(normalize_name("  Bob Smith \t"), Some("Bob Smith"));
        assert_eq!(normalize_name(""), None);
        assert_eq!(normalize_name("   \n\t"), None);
    }

    #[test]
    fn test_formatted_balance() {
        let account = Account::new(1, "Alice", 7000);
        assert_eq!(account.formatted_balance(), "70.00");
    }
}
