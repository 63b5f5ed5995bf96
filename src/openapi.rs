use utoipa::OpenApi;

use crate::domain::{Transaction, TransactionType, Wallet};
use crate::handlers::{
    self, HealthStatus, IdResponse,
    wallets::{CreateTransactionRequest, CreateWalletRequest},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::wallets::create_wallet,
        handlers::wallets::get_wallet,
        handlers::wallets::delete_wallet,
        handlers::wallets::create_transaction,
        handlers::wallets::list_transactions,
        handlers::wallets::get_wallet_transaction,
        handlers::transactions::get_transaction
    ),
    components(schemas(
        Wallet,
        Transaction,
        TransactionType,
        CreateWalletRequest,
        CreateTransactionRequest,
        IdResponse,
        HealthStatus
    )),
    tags(
        (name = "Wallets", description = "Wallet management"),
        (name = "Transactions", description = "Deposits and withdrawals"),
        (name = "Health", description = "Service health")
    ),
    info(
        title = "Wallet API",
        description = "Wallets with balance limits and their deposit/withdrawal history"
    )
)]
pub struct ApiDoc;
