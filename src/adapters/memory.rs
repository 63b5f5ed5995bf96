//! In-memory implementations of the store contracts.
//! Used by tests and by `serve --in-memory`; contents are lost on shutdown.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{NewTransaction, NewWallet, PageRequest, Transaction, TransactionType, Wallet};
use crate::ports::{RepositoryError, RepositoryResult, TransactionRepository, WalletRepository};

/// Wallets plus the transaction log that `apply_transaction` appends to.
/// Share the log with an `InMemoryTransactionRepository` through
/// `with_transactions` so the records are visible to listings.
#[derive(Default)]
pub struct InMemoryWalletRepository {
    wallets: RwLock<HashMap<Uuid, Wallet>>,
    transactions: Arc<InMemoryTransactionRepository>,
}

impl InMemoryWalletRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transactions(transactions: Arc<InMemoryTransactionRepository>) -> Self {
        Self {
            wallets: RwLock::default(),
            transactions,
        }
    }

    pub async fn len(&self) -> usize {
        self.wallets.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.wallets.read().await.is_empty()
    }
}

#[async_trait]
impl WalletRepository for InMemoryWalletRepository {
    async fn create(&self, wallet: &NewWallet) -> RepositoryResult<Wallet> {
        let mut wallets = self.wallets.write().await;
        if wallets.values().any(|w| w.user_id == wallet.user_id) {
            return Err(RepositoryError::Conflict(format!(
                "wallet for user {} already exists",
                wallet.user_id
            )));
        }

        let created = Wallet {
            id: Uuid::new_v4(),
            user_id: wallet.user_id.clone(),
            balance: wallet.balance.clone(),
            balance_upper_limit: wallet.balance_upper_limit.clone(),
            transaction_upper_limit: wallet.transaction_upper_limit.clone(),
            created_at: Utc::now(),
            version: 0,
        };
        wallets.insert(created.id, created.clone());

        Ok(created)
    }

    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Wallet> {
        self.wallets
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    async fn find_by_user_id(&self, user_id: &str) -> RepositoryResult<Option<Wallet>> {
        Ok(self
            .wallets
            .read()
            .await
            .values()
            .find(|w| w.user_id == user_id)
            .cloned())
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        self.wallets
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    async fn apply_transaction(
        &self,
        expected_version: i64,
        new_balance: &BigDecimal,
        tx: &NewTransaction,
    ) -> RepositoryResult<Transaction> {
        // Both locks are held before either write, and nothing awaits in
        // between, so a dropped future leaves both untouched.
        let mut wallets = self.wallets.write().await;
        let mut log = self.transactions.transactions.write().await;

        let wallet = wallets
            .get_mut(&tx.wallet_id)
            .ok_or_else(|| RepositoryError::NotFound(tx.wallet_id.to_string()))?;

        if wallet.version != expected_version {
            return Err(RepositoryError::Conflict(format!(
                "wallet {} changed since version {}",
                tx.wallet_id, expected_version
            )));
        }

        let record = new_record(tx);
        wallet.balance = new_balance.clone();
        wallet.version += 1;
        log.push(record.clone());

        Ok(record)
    }
}

fn new_record(tx: &NewTransaction) -> Transaction {
    Transaction {
        id: Uuid::new_v4(),
        wallet_id: tx.wallet_id,
        kind: tx.kind,
        amount: tx.amount.clone(),
        created_at: Utc::now(),
    }
}

/// Keeps transactions in insertion order, which is the storage order
/// listings return.
#[derive(Default)]
pub struct InMemoryTransactionRepository {
    transactions: RwLock<Vec<Transaction>>,
}

impl InMemoryTransactionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.transactions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.transactions.read().await.is_empty()
    }
}

#[async_trait]
impl TransactionRepository for InMemoryTransactionRepository {
    async fn create(&self, tx: &NewTransaction) -> RepositoryResult<Transaction> {
        let created = new_record(tx);
        self.transactions.write().await.push(created.clone());

        Ok(created)
    }

    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Transaction> {
        self.transactions
            .read()
            .await
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    async fn list_by_wallet_id(
        &self,
        wallet_id: Uuid,
        kind: Option<TransactionType>,
        page: PageRequest,
    ) -> RepositoryResult<Vec<Transaction>> {
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);

        Ok(self
            .transactions
            .read()
            .await
            .iter()
            .filter(|t| t.wallet_id == wallet_id)
            .filter(|t| kind.map_or(true, |k| t.kind == k))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }
}
