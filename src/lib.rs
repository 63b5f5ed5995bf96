pub mod adapters;
pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod ports;
pub mod services;
pub mod validation;

use axum::{
    Json, Router,
    routing::get,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use utoipa::OpenApi;

use crate::adapters::{
    InMemoryTransactionRepository, InMemoryWalletRepository, PostgresTransactionRepository,
    PostgresWalletRepository,
};
use crate::config::Limits;
use crate::ports::{TransactionRepository, WalletRepository};
use crate::services::{TransactionService, WalletService};

#[derive(Clone)]
pub struct AppState {
    pub wallet_service: WalletService,
    pub transaction_service: TransactionService,
    /// Present when backed by Postgres; used by the health check.
    pub db: Option<sqlx::PgPool>,
}

impl AppState {
    pub fn new(
        wallets: Arc<dyn WalletRepository>,
        transactions: Arc<dyn TransactionRepository>,
        limits: Limits,
        db: Option<sqlx::PgPool>,
    ) -> Self {
        let transaction_service = TransactionService::new(transactions);
        let wallet_service = WalletService::new(wallets, transaction_service.clone(), limits);

        Self {
            wallet_service,
            transaction_service,
            db,
        }
    }

    pub fn postgres(pool: sqlx::PgPool, limits: Limits) -> Self {
        Self::new(
            Arc::new(PostgresWalletRepository::new(pool.clone())),
            Arc::new(PostgresTransactionRepository::new(pool.clone())),
            limits,
            Some(pool),
        )
    }

    pub fn in_memory(limits: Limits) -> Self {
        let transactions = Arc::new(InMemoryTransactionRepository::new());
        Self::new(
            Arc::new(InMemoryWalletRepository::with_transactions(transactions.clone())),
            transactions,
            limits,
            None,
        )
    }
}

pub fn create_app(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api-docs/openapi.json", get(|| async { Json(openapi::ApiDoc::openapi()) }))
        .route("/wallets", axum::routing::post(handlers::wallets::create_wallet))
        .route(
            "/wallets/:id",
            get(handlers::wallets::get_wallet).delete(handlers::wallets::delete_wallet),
        )
        .route(
            "/wallets/:id/transactions",
            get(handlers::wallets::list_transactions).post(handlers::wallets::create_transaction),
        )
        .route(
            "/wallets/:id/transactions/:transactionId",
            get(handlers::wallets::get_wallet_transaction),
        )
        .route("/transactions/:id", get(handlers::transactions::get_transaction))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(axum::middleware::from_fn(middleware::request_logger_middleware))
        .with_state(state)
}
