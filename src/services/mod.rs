pub mod transaction;
pub mod wallet;

pub use transaction::TransactionService;
pub use wallet::{CreateTransaction, CreateWallet, WalletService};

use bigdecimal::BigDecimal;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::InvalidTransactionType;
use crate::ports::RepositoryError;

/// Outcomes the services report back to the HTTP layer. Store failures
/// that are not one of the domain cases pass through as `Repository`.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("no wallet with id {0} exists")]
    WalletNotFound(Uuid),

    #[error("no transaction with id {0} exists")]
    TransactionNotFound(Uuid),

    #[error("wallet for user {0} already exists")]
    DuplicateOwner(String),

    #[error("{0}")]
    LimitExceeded(String),

    #[error("transaction amount {amount} is below the minimum of {minimum}")]
    BelowMinimum {
        amount: BigDecimal,
        minimum: BigDecimal,
    },

    #[error("balance {balance} is insufficient for a withdrawal of {amount}")]
    InsufficientBalance {
        balance: BigDecimal,
        amount: BigDecimal,
    },

    #[error(transparent)]
    InvalidType(#[from] InvalidTransactionType),

    #[error("wallet {0} was modified concurrently, retry the transaction")]
    ConcurrentModification(Uuid),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
