//! Wallet service: the only component that changes a wallet's balance.

use bigdecimal::BigDecimal;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::Limits;
use crate::domain::{NewTransaction, NewWallet, PageRequest, Transaction, TransactionType, Wallet};
use crate::ports::{RepositoryError, WalletRepository};
use crate::services::{ServiceError, ServiceResult, TransactionService};

/// Input for `WalletService::create_wallet`.
#[derive(Debug, Clone)]
pub struct CreateWallet {
    pub user_id: String,
    pub balance_upper_limit: BigDecimal,
    pub transaction_upper_limit: BigDecimal,
}

/// Input for `WalletService::create_transaction`. The type is kept as the
/// raw request string so an unknown value fails before any lookup.
#[derive(Debug, Clone)]
pub struct CreateTransaction {
    pub kind: String,
    pub amount: BigDecimal,
}

#[derive(Clone)]
pub struct WalletService {
    wallets: Arc<dyn WalletRepository>,
    transactions: TransactionService,
    limits: Limits,
}

impl WalletService {
    pub fn new(
        wallets: Arc<dyn WalletRepository>,
        transactions: TransactionService,
        limits: Limits,
    ) -> Self {
        Self {
            wallets,
            transactions,
            limits,
        }
    }

    pub async fn create_wallet(&self, input: CreateWallet) -> ServiceResult<Wallet> {
        if input.balance_upper_limit > self.limits.max_balance {
            return Err(ServiceError::LimitExceeded(format!(
                "balance upper limit {} is above the maximum balance limit {}",
                input.balance_upper_limit, self.limits.max_balance
            )));
        }

        if input.transaction_upper_limit > self.limits.max_transaction_amount {
            return Err(ServiceError::LimitExceeded(format!(
                "transaction upper limit {} is above the maximum transaction limit {}",
                input.transaction_upper_limit, self.limits.max_transaction_amount
            )));
        }

        if self.limits.initial_balance > input.balance_upper_limit {
            return Err(ServiceError::LimitExceeded(format!(
                "balance upper limit {} is below the initial balance {}",
                input.balance_upper_limit, self.limits.initial_balance
            )));
        }

        if self.wallets.find_by_user_id(&input.user_id).await?.is_some() {
            tracing::warn!(user_id = %input.user_id, "Wallet already exists for user");
            return Err(ServiceError::DuplicateOwner(input.user_id));
        }

        let new_wallet = NewWallet {
            user_id: input.user_id,
            balance: self.limits.initial_balance.clone(),
            balance_upper_limit: input.balance_upper_limit,
            transaction_upper_limit: input.transaction_upper_limit,
        };

        // A concurrent create for the same user loses on the unique key.
        let wallet = self.wallets.create(&new_wallet).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => ServiceError::DuplicateOwner(new_wallet.user_id.clone()),
            other => ServiceError::Repository(other),
        })?;

        tracing::info!(wallet_id = %wallet.id, user_id = %wallet.user_id, "Wallet created");
        Ok(wallet)
    }

    pub async fn get_wallet(&self, id: Uuid) -> ServiceResult<Wallet> {
        self.wallets
            .get_by_id(id)
            .await
            .map_err(|e| wallet_lookup_error(id, e))
    }

    pub async fn delete_wallet(&self, id: Uuid) -> ServiceResult<()> {
        self.get_wallet(id).await?;

        self.wallets
            .delete(id)
            .await
            .map_err(|e| wallet_lookup_error(id, e))?;

        tracing::info!(wallet_id = %id, "Wallet deleted");
        Ok(())
    }

    /// Validates the transaction against the wallet and system limits, then
    /// writes the new balance together with the transaction record.
    pub async fn create_transaction(
        &self,
        wallet_id: Uuid,
        input: CreateTransaction,
    ) -> ServiceResult<Transaction> {
        let kind: TransactionType = input.kind.parse()?;
        let wallet = self.get_wallet(wallet_id).await?;

        let new_balance = self.check_transaction_is_processable(&wallet, kind, &input.amount)?;

        let record = NewTransaction {
            wallet_id: wallet.id,
            kind,
            amount: input.amount,
        };

        let tx = self
            .wallets
            .apply_transaction(wallet.version, &new_balance, &record)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => {
                    tracing::warn!(wallet_id = %wallet.id, "Balance changed during transaction");
                    ServiceError::ConcurrentModification(wallet.id)
                }
                other => wallet_lookup_error(wallet.id, other),
            })?;

        tracing::info!(
            wallet_id = %wallet.id,
            transaction_id = %tx.id,
            kind = %kind,
            amount = %tx.amount,
            new_balance = %new_balance,
            "Transaction applied"
        );
        Ok(tx)
    }

    /// Returns the balance the wallet would have after the transaction.
    fn check_transaction_is_processable(
        &self,
        wallet: &Wallet,
        kind: TransactionType,
        amount: &BigDecimal,
    ) -> ServiceResult<BigDecimal> {
        if amount > &wallet.transaction_upper_limit {
            return Err(ServiceError::LimitExceeded(format!(
                "transaction amount {} is above the wallet's transaction limit {}",
                amount, wallet.transaction_upper_limit
            )));
        }

        if amount < &self.limits.min_transaction_amount {
            return Err(ServiceError::BelowMinimum {
                amount: amount.clone(),
                minimum: self.limits.min_transaction_amount.clone(),
            });
        }

        match kind {
            TransactionType::Deposit => {
                let new_balance = &wallet.balance + amount;
                if new_balance > wallet.balance_upper_limit {
                    return Err(ServiceError::LimitExceeded(format!(
                        "deposit of {} would put the balance above the wallet's limit {}",
                        amount, wallet.balance_upper_limit
                    )));
                }
                Ok(new_balance)
            }
            TransactionType::Withdrawal => {
                let new_balance = &wallet.balance - amount;
                if new_balance < self.limits.min_balance {
                    return Err(ServiceError::InsufficientBalance {
                        balance: wallet.balance.clone(),
                        amount: amount.clone(),
                    });
                }
                Ok(new_balance)
            }
        }
    }

    /// Lists a wallet's transactions. An empty filter means every type.
    pub async fn get_transactions(
        &self,
        wallet_id: Uuid,
        type_filter: &str,
        page: PageRequest,
    ) -> ServiceResult<Vec<Transaction>> {
        let kind = if type_filter.is_empty() {
            None
        } else {
            Some(type_filter.parse::<TransactionType>()?)
        };

        self.get_wallet(wallet_id).await?;

        self.transactions
            .get_transactions_by_wallet_id(wallet_id, kind, page)
            .await
    }

    pub async fn get_wallet_transaction(
        &self,
        wallet_id: Uuid,
        transaction_id: Uuid,
    ) -> ServiceResult<Transaction> {
        self.get_wallet(wallet_id).await?;

        let tx = self.transactions.get_transaction(transaction_id).await?;
        if tx.wallet_id != wallet_id {
            return Err(ServiceError::TransactionNotFound(transaction_id));
        }

        Ok(tx)
    }
}

fn wallet_lookup_error(id: Uuid, err: RepositoryError) -> ServiceError {
    match err {
        RepositoryError::NotFound(_) => ServiceError::WalletNotFound(id),
        other => ServiceError::Repository(other),
    }
}
