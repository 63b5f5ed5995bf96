use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{NewTransaction, PageRequest, Transaction, TransactionType};
use crate::ports::{RepositoryError, TransactionRepository};
use crate::services::{ServiceError, ServiceResult};

/// Creates and reads transaction records on behalf of the wallet service.
#[derive(Clone)]
pub struct TransactionService {
    repository: Arc<dyn TransactionRepository>,
}

impl TransactionService {
    pub fn new(repository: Arc<dyn TransactionRepository>) -> Self {
        Self { repository }
    }

    pub async fn create_transaction(&self, tx: &NewTransaction) -> ServiceResult<Transaction> {
        let created = self.repository.create(tx).await?;

        tracing::info!(
            transaction_id = %created.id,
            wallet_id = %created.wallet_id,
            kind = %created.kind,
            amount = %created.amount,
            "Transaction recorded"
        );

        Ok(created)
    }

    pub async fn get_transaction(&self, id: Uuid) -> ServiceResult<Transaction> {
        self.repository.get_by_id(id).await.map_err(|e| match e {
            RepositoryError::NotFound(_) => ServiceError::TransactionNotFound(id),
            other => ServiceError::Repository(other),
        })
    }

    pub async fn get_transactions_by_wallet_id(
        &self,
        wallet_id: Uuid,
        type_filter: Option<TransactionType>,
        page: PageRequest,
    ) -> ServiceResult<Vec<Transaction>> {
        Ok(self
            .repository
            .list_by_wallet_id(wallet_id, type_filter, page)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryTransactionRepository;
    use bigdecimal::BigDecimal;

    fn service() -> TransactionService {
        TransactionService::new(Arc::new(InMemoryTransactionRepository::new()))
    }

    #[tokio::test]
    async fn test_create_then_get_transaction() {
        let service = service();
        let wallet_id = Uuid::new_v4();

        let created = service
            .create_transaction(&NewTransaction {
                wallet_id,
                kind: TransactionType::Deposit,
                amount: BigDecimal::from(200),
            })
            .await
            .unwrap();

        let fetched = service.get_transaction(created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.wallet_id, wallet_id);
    }

    #[tokio::test]
    async fn test_get_missing_transaction_is_not_found() {
        let id = Uuid::new_v4();
        let err = service().get_transaction(id).await.unwrap_err();
        assert!(matches!(err, ServiceError::TransactionNotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn test_get_transactions_with_and_without_type() {
        let service = service();
        let wallet_id = Uuid::new_v4();
        for kind in [TransactionType::Deposit, TransactionType::Withdrawal] {
            service
                .create_transaction(&NewTransaction {
                    wallet_id,
                    kind,
                    amount: BigDecimal::from(100),
                })
                .await
                .unwrap();
        }

        let all = service
            .get_transactions_by_wallet_id(wallet_id, None, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 2);

        let deposits = service
            .get_transactions_by_wallet_id(
                wallet_id,
                Some(TransactionType::Deposit),
                PageRequest::default(),
            )
            .await
            .unwrap();
        assert_eq!(deposits.len(), 1);
        assert_eq!(deposits[0].kind, TransactionType::Deposit);
    }
}
