//! Postgres implementation of TransactionRepository.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::domain::{NewTransaction, PageRequest, Transaction, TransactionType};
use crate::ports::{RepositoryError, RepositoryResult, TransactionRepository};

/// Postgres-backed transaction repository.
#[derive(Clone)]
pub struct PostgresTransactionRepository {
    pool: PgPool,
}

impl PostgresTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionRepository for PostgresTransactionRepository {
    async fn create(&self, tx: &NewTransaction) -> RepositoryResult<Transaction> {
        let mut conn = self.pool.acquire().await.map_err(RepositoryError::from)?;
        insert_transaction(&mut conn, tx).await
    }

    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Transaction> {
        let row = sqlx::query_as::<_, TransactionRow>(
            "SELECT id, wallet_id, type, amount, created_at FROM transactions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        row.ok_or_else(|| RepositoryError::NotFound(id.to_string()))?
            .into_domain()
    }

    async fn list_by_wallet_id(
        &self,
        wallet_id: Uuid,
        kind: Option<TransactionType>,
        page: PageRequest,
    ) -> RepositoryResult<Vec<Transaction>> {
        // A NULL type parameter disables the type filter.
        let rows = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT id, wallet_id, type, amount, created_at FROM transactions
            WHERE wallet_id = $1 AND ($2::TEXT IS NULL OR type = $2)
            ORDER BY seq ASC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(wallet_id)
        .bind(kind.map(|k| k.as_str()))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        rows.into_iter().map(|r| r.into_domain()).collect()
    }
}

/// Inserts one transaction record on `conn`, which may be inside an open
/// database transaction.
pub(crate) async fn insert_transaction(
    conn: &mut PgConnection,
    tx: &NewTransaction,
) -> RepositoryResult<Transaction> {
    let row = sqlx::query_as::<_, TransactionRow>(
        r#"
        INSERT INTO transactions (id, wallet_id, type, amount, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, wallet_id, type, amount, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(tx.wallet_id)
    .bind(tx.kind.as_str())
    .bind(&tx.amount)
    .bind(Utc::now())
    .fetch_one(conn)
    .await
    .map_err(RepositoryError::from)?;

    row.into_domain()
}

/// Internal row type for SQLx. Not exposed outside the adapter.
#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: Uuid,
    wallet_id: Uuid,
    #[sqlx(rename = "type")]
    kind: String,
    amount: BigDecimal,
    created_at: DateTime<Utc>,
}

impl TransactionRow {
    fn into_domain(self) -> RepositoryResult<Transaction> {
        let kind = self
            .kind
            .parse::<TransactionType>()
            .map_err(|e| RepositoryError::Corrupt(format!("transaction {}: {}", self.id, e)))?;

        Ok(Transaction {
            id: self.id,
            wallet_id: self.wallet_id,
            kind,
            amount: self.amount,
            created_at: self.created_at,
        })
    }
}
