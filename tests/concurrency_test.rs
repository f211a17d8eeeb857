mod common;

use anyhow::Result;
use std::sync::Arc;

use bankbook::application::ErrorKind;
use common::{funded_account, test_service};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adjustments_are_serializable() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let service = Arc::new(service);

    // Starting balance covers every withdrawal even if all run first
    let account = funded_account(&service, "Shared", 1_000_00).await?;

    let mut tasks = Vec::new();
    for i in 0..40 {
        let service = Arc::clone(&service);
        tasks.push(tokio::spawn(async move {
            if i % 2 == 0 {
                service.deposit(account, 12_50).await
            } else {
                service.withdraw(account, 7_25).await
            }
        }));
    }

    for task in tasks {
        task.await??;
    }

    let expected = 1_000_00 + 20 * 12_50 - 20 * 7_25;
    assert_eq!(service.get_balance(account).await?, expected);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_withdrawals_never_overdraw() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let service = Arc::new(service);
    let account = funded_account(&service, "Contended", 100_00).await?;

    // 25 withdrawals of 10.00 against 100.00: exactly 10 can succeed
    let mut tasks = Vec::new();
    for _ in 0..25 {
        let service = Arc::clone(&service);
        tasks.push(tokio::spawn(
            async move { service.withdraw(account, 10_00).await },
        ));
    }

    let mut succeeded = 0;
    let mut rejected = 0;
    for task in tasks {
        match task.await? {
            Ok(balance) => {
                assert!(balance >= 0);
                succeeded += 1;
            }
            Err(err) => {
                assert_eq!(err.kind(), ErrorKind::InsufficientFunds);
                rejected += 1;
            }
        }
    }

    assert_eq!(succeeded, 10);
    assert_eq!(rejected, 15);
    assert_eq!(service.get_balance(account).await?, 0);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_independent_accounts_under_load() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let service = Arc::new(service);

    let mut accounts = Vec::new();
    for name in ["A", "B", "C", "D"] {
        accounts.push(service.open_account(name).await?);
    }

    let mut tasks = Vec::new();
    for &account in &accounts {
        for _ in 0..10 {
            let service = Arc::clone(&service);
            tasks.push(tokio::spawn(async move { service.deposit(account, 1_00).await }));
        }
    }
    for task in tasks {
        task.await??;
    }

    for account in service.snapshot().await? {
        assert_eq!(account.balance, 10_00, "account {}", account.name);
    }
    Ok(())
}
