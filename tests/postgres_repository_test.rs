use bigdecimal::BigDecimal;
use sqlx::PgPool;
use std::path::Path;
use uuid::Uuid;
use wallet_api::adapters::{PostgresTransactionRepository, PostgresWalletRepository};
use wallet_api::config::DatabaseConfig;
use wallet_api::db;
use wallet_api::domain::{NewTransaction, NewWallet, PageRequest, TransactionType};
use wallet_api::ports::{RepositoryError, TransactionRepository, WalletRepository};

async fn setup_pool() -> Option<PgPool> {
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(v) => v,
        Err(_) => {
            println!("Skipping Postgres repository test: DATABASE_URL not set");
            return None;
        }
    };

    let pool = db::create_pool(&DatabaseConfig {
        url: database_url,
        max_connections: 2,
    })
    .await
    .expect("Failed to connect to database");

    let migrations = Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations");
    db::run_migrations(&pool, &migrations)
        .await
        .expect("Failed to run migrations");

    Some(pool)
}

fn new_wallet() -> NewWallet {
    NewWallet {
        user_id: format!("pg-test-{}", Uuid::new_v4()),
        balance: BigDecimal::from(0),
        balance_upper_limit: BigDecimal::from(1000),
        transaction_upper_limit: BigDecimal::from(500),
    }
}

#[tokio::test]
async fn test_wallet_round_trip_and_unique_owner() {
    let Some(pool) = setup_pool().await else {
        return;
    };
    let repo = PostgresWalletRepository::new(pool);

    let input = new_wallet();
    let wallet = repo.create(&input).await.unwrap();
    assert_eq!(wallet.user_id, input.user_id);
    assert_eq!(wallet.version, 0);

    let fetched = repo.get_by_id(wallet.id).await.unwrap();
    assert_eq!(fetched.balance_upper_limit, BigDecimal::from(1000));

    let by_user = repo.find_by_user_id(&input.user_id).await.unwrap();
    assert_eq!(by_user.map(|w| w.id), Some(wallet.id));

    let duplicate = repo.create(&input).await;
    assert!(matches!(duplicate, Err(RepositoryError::Conflict(_))));

    repo.delete(wallet.id).await.unwrap();
    assert!(matches!(
        repo.get_by_id(wallet.id).await,
        Err(RepositoryError::NotFound(_))
    ));
    assert!(matches!(
        repo.delete(wallet.id).await,
        Err(RepositoryError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_apply_transaction_writes_balance_and_record_together() {
    let Some(pool) = setup_pool().await else {
        return;
    };
    let wallets = PostgresWalletRepository::new(pool.clone());
    let transactions = PostgresTransactionRepository::new(pool);
    let wallet = wallets.create(&new_wallet()).await.unwrap();

    let deposit = NewTransaction {
        wallet_id: wallet.id,
        kind: TransactionType::Deposit,
        amount: BigDecimal::from(250),
    };
    let record = wallets
        .apply_transaction(wallet.version, &BigDecimal::from(250), &deposit)
        .await
        .unwrap();

    let updated = wallets.get_by_id(wallet.id).await.unwrap();
    assert_eq!(updated.balance, BigDecimal::from(250));
    assert_eq!(updated.version, wallet.version + 1);
    assert_eq!(transactions.get_by_id(record.id).await.unwrap().amount, BigDecimal::from(250));

    let stale = wallets
        .apply_transaction(wallet.version, &BigDecimal::from(999), &deposit)
        .await;
    assert!(matches!(stale, Err(RepositoryError::Conflict(_))));
    assert_eq!(
        wallets.get_by_id(wallet.id).await.unwrap().balance,
        BigDecimal::from(250)
    );
    let recorded = transactions
        .list_by_wallet_id(wallet.id, None, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(recorded.len(), 1);

    let missing = NewTransaction {
        wallet_id: Uuid::new_v4(),
        ..deposit
    };
    let result = wallets
        .apply_transaction(0, &BigDecimal::from(1), &missing)
        .await;
    assert!(matches!(result, Err(RepositoryError::NotFound(_))));

    wallets.delete(wallet.id).await.unwrap();
}

#[tokio::test]
async fn test_transactions_filtered_and_paged() {
    let Some(pool) = setup_pool().await else {
        return;
    };
    let wallets = PostgresWalletRepository::new(pool.clone());
    let transactions = PostgresTransactionRepository::new(pool);
    let wallet = wallets.create(&new_wallet()).await.unwrap();

    let entries = [
        (TransactionType::Deposit, 100),
        (TransactionType::Withdrawal, 20),
        (TransactionType::Deposit, 200),
        (TransactionType::Deposit, 300),
    ];
    for (kind, amount) in entries {
        transactions
            .create(&NewTransaction {
                wallet_id: wallet.id,
                kind,
                amount: BigDecimal::from(amount),
            })
            .await
            .unwrap();
    }

    let all = transactions
        .list_by_wallet_id(wallet.id, None, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 4);

    let amounts: Vec<BigDecimal> = all.iter().map(|t| t.amount.clone()).collect();
    let inserted: Vec<BigDecimal> = entries.iter().map(|(_, a)| BigDecimal::from(*a)).collect();
    assert_eq!(amounts, inserted);

    let deposits = transactions
        .list_by_wallet_id(wallet.id, Some(TransactionType::Deposit), PageRequest::new(0, 2))
        .await
        .unwrap();
    assert_eq!(deposits.len(), 2);
    assert_eq!(deposits[0].amount, BigDecimal::from(100));
    assert_eq!(deposits[1].amount, BigDecimal::from(200));

    let withdrawals = transactions
        .list_by_wallet_id(wallet.id, Some(TransactionType::Withdrawal), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(withdrawals.len(), 1);
    assert_eq!(withdrawals[0].amount, BigDecimal::from(20));

    let fetched = transactions.get_by_id(withdrawals[0].id).await.unwrap();
    assert_eq!(fetched.wallet_id, wallet.id);

    assert!(matches!(
        transactions.get_by_id(Uuid::new_v4()).await,
        Err(RepositoryError::NotFound(_))
    ));

    wallets.delete(wallet.id).await.unwrap();
}
