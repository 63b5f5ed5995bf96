//! Store contracts the services depend on.
//! Each call is durable once it returns `Ok`; no guarantee spans two calls.
//! `WalletRepository::apply_transaction` is the one write that covers both
//! tables.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{NewTransaction, NewWallet, PageRequest, Transaction, TransactionType, Wallet};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("record not found: {0}")]
    NotFound(String),

    #[error("conflicting write: {0}")]
    Conflict(String),

    #[error("stored record is invalid: {0}")]
    Corrupt(String),

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepositoryError::NotFound(err.to_string()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                RepositoryError::Conflict(db_err.message().to_string())
            }
            _ => RepositoryError::Database(err),
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[async_trait]
pub trait WalletRepository: Send + Sync {
    /// Persists a wallet and returns it with its assigned id.
    /// A second wallet for the same user id is a `Conflict`.
    async fn create(&self, wallet: &NewWallet) -> RepositoryResult<Wallet>;

    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Wallet>;

    async fn find_by_user_id(&self, user_id: &str) -> RepositoryResult<Option<Wallet>>;

    async fn delete(&self, id: Uuid) -> RepositoryResult<()>;

    /// Sets the balance of `tx.wallet_id` to `new_balance` and stores the
    /// transaction record as one unit: either both are written or neither.
    /// The write only happens while the stored version still equals
    /// `expected_version` (then bumped), otherwise `Conflict`.
    async fn apply_transaction(
        &self,
        expected_version: i64,
        new_balance: &BigDecimal,
        tx: &NewTransaction,
    ) -> RepositoryResult<Transaction>;
}

#[async_trait]
pub trait TransactionRepository: Send + Sync {
    async fn create(&self, tx: &NewTransaction) -> RepositoryResult<Transaction>;

    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Transaction>;

    /// Transactions of a wallet in storage order, optionally narrowed to one type.
    async fn list_by_wallet_id(
        &self,
        wallet_id: Uuid,
        kind: Option<TransactionType>,
        page: PageRequest,
    ) -> RepositoryResult<Vec<Transaction>>;
}
