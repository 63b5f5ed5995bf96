//! Postgres implementation of WalletRepository.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::adapters::postgres_transaction_repository::insert_transaction;
use crate::domain::{NewTransaction, NewWallet, Transaction, Wallet};
use crate::ports::{RepositoryError, RepositoryResult, WalletRepository};

const WALLET_COLUMNS: &str =
    "id, user_id, balance, balance_upper_limit, transaction_upper_limit, version, created_at";

/// Postgres-backed wallet repository.
#[derive(Clone)]
pub struct PostgresWalletRepository {
    pool: PgPool,
}

impl PostgresWalletRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WalletRepository for PostgresWalletRepository {
    async fn create(&self, wallet: &NewWallet) -> RepositoryResult<Wallet> {
        let row = sqlx::query_as::<_, WalletRow>(&format!(
            r#"
            INSERT INTO wallets (
                id, user_id, balance, balance_upper_limit, transaction_upper_limit, version, created_at
            ) VALUES ($1, $2, $3, $4, $5, 0, $6)
            RETURNING {WALLET_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&wallet.user_id)
        .bind(&wallet.balance)
        .bind(&wallet.balance_upper_limit)
        .bind(&wallet.transaction_upper_limit)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        Ok(row.into_domain())
    }

    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Wallet> {
        let row = sqlx::query_as::<_, WalletRow>(&format!(
            "SELECT {WALLET_COLUMNS} FROM wallets WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        row.map(|r| r.into_domain())
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    async fn find_by_user_id(&self, user_id: &str) -> RepositoryResult<Option<Wallet>> {
        let row = sqlx::query_as::<_, WalletRow>(&format!(
            "SELECT {WALLET_COLUMNS} FROM wallets WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        Ok(row.map(|r| r.into_domain()))
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM wallets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(RepositoryError::from)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id.to_string()));
        }

        Ok(())
    }

    async fn apply_transaction(
        &self,
        expected_version: i64,
        new_balance: &BigDecimal,
        tx: &NewTransaction,
    ) -> RepositoryResult<Transaction> {
        // Dropping `db_tx` before commit rolls both writes back.
        let mut db_tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let updated = sqlx::query(
            "UPDATE wallets SET balance = $1, version = version + 1 WHERE id = $2 AND version = $3",
        )
        .bind(new_balance)
        .bind(tx.wallet_id)
        .bind(expected_version)
        .execute(&mut *db_tx)
        .await
        .map_err(RepositoryError::from)?;

        if updated.rows_affected() == 0 {
            // Distinguish a stale version from a wallet deleted in the meantime.
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM wallets WHERE id = $1)")
                    .bind(tx.wallet_id)
                    .fetch_one(&mut *db_tx)
                    .await
                    .map_err(RepositoryError::from)?;

            return if exists {
                Err(RepositoryError::Conflict(format!(
                    "wallet {} changed since version {}",
                    tx.wallet_id, expected_version
                )))
            } else {
                Err(RepositoryError::NotFound(tx.wallet_id.to_string()))
            };
        }

        let record = insert_transaction(&mut db_tx, tx).await?;
        db_tx.commit().await.map_err(RepositoryError::from)?;

        Ok(record)
    }
}

/// Internal row type for SQLx. Not exposed outside the adapter.
#[derive(Debug, sqlx::FromRow)]
struct WalletRow {
    id: Uuid,
    user_id: String,
    balance: BigDecimal,
    balance_upper_limit: BigDecimal,
    transaction_upper_limit: BigDecimal,
    version: i64,
    created_at: DateTime<Utc>,
}

impl WalletRow {
    fn into_domain(self) -> Wallet {
        Wallet {
            id: self.id,
            user_id: self.user_id,
            balance: self.balance,
            balance_upper_limit: self.balance_upper_limit,
            transaction_upper_limit: self.transaction_upper_limit,
            created_at: self.created_at,
            version: self.version,
        }
    }
}
