use std::path::PathBuf;
use std::time::Duration;

/// Default database file, created next to the working directory.
pub const DEFAULT_DATABASE: &str = "bankbook.db";

/// How long a writer waits on SQLite's file lock before giving up.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection settings for the ledger database.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Path of the SQLite database file.
    pub database: PathBuf,
    pub max_connections: u32,
    pub busy_timeout: Duration,
}

impl LedgerConfig {
    pub fn new(database: impl Into<PathBuf>) -> Self {
        Self {
            database: database.into(),
            ..Self::default()
        }
    }

    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections.max(1);
        self
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE),
            max_connections: 4,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides_defaults() {
        let config = LedgerConfig::new("/tmp/ledger.db")
            .with_busy_timeout(Duration::from_millis(250))
            .with_max_connections(0);

        assert_eq!(config.database, PathBuf::from("/tmp/ledger.db"));
        assert_eq!(config.busy_timeout, Duration::from_millis(250));
        assert_eq!(config.max_connections, 1);
    }
}
