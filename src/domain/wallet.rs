//! Wallet domain entity.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// A user's wallet. At most one exists per `user_id`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub id: Uuid,
    pub user_id: String,
    #[schema(value_type = String, example = "250.00")]
    pub balance: BigDecimal,
    #[schema(value_type = String, example = "1000")]
    pub balance_upper_limit: BigDecimal,
    #[schema(value_type = String, example = "500")]
    pub transaction_upper_limit: BigDecimal,
    pub created_at: DateTime<Utc>,
    /// Bumped on every balance write; guards the compare-and-swap in
    /// `WalletRepository::apply_transaction`.
    #[serde(skip)]
    pub version: i64,
}

/// Store input for a wallet that has no id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWallet {
    pub user_id: String,
    pub balance: BigDecimal,
    pub balance_upper_limit: BigDecimal,
    pub transaction_upper_limit: BigDecimal,
}
