//! Framework-agnostic wallet and transaction entities.

pub mod transaction;
pub mod wallet;

pub use transaction::{
    InvalidTransactionType, NewTransaction, PageRequest, Transaction, TransactionType,
};
pub use wallet::{NewWallet, Wallet};
