use axum::{
    Json,
    extract::{Path, Query, State, rejection::{JsonRejection, PathRejection, QueryRejection}},
    http::StatusCode,
    response::IntoResponse,
};
use bigdecimal::BigDecimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::AppState;
use crate::domain::{Transaction, Wallet};
use crate::error::AppError;
use crate::handlers::{IdResponse, deserialize_amount, path_param};
use crate::services::{CreateTransaction, CreateWallet};
use crate::validation;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateWalletRequest {
    pub user_id: String,
    #[serde(deserialize_with = "deserialize_amount")]
    #[schema(value_type = String, example = "1000")]
    pub balance_upper_limit: BigDecimal,
    #[serde(deserialize_with = "deserialize_amount")]
    #[schema(value_type = String, example = "500")]
    pub transaction_upper_limit: BigDecimal,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTransactionRequest {
    /// `deposit` or `withdrawal`
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(deserialize_with = "deserialize_amount")]
    #[schema(value_type = String, example = "100.50")]
    pub amount: BigDecimal,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListTransactionsParams {
    /// Only return transactions of this type.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Zero-based page number, defaults to 0.
    pub page_no: Option<i64>,
    /// Page size, defaults to 10.
    pub page_size: Option<i64>,
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

#[utoipa::path(
    post,
    path = "/wallets",
    request_body = CreateWalletRequest,
    responses(
        (status = 201, description = "Wallet created", body = IdResponse),
        (status = 400, description = "Malformed request"),
        (status = 422, description = "Limit above system maximum or wallet already exists for user")
    ),
    tag = "Wallets"
)]
pub async fn create_wallet(
    State(state): State<AppState>,
    payload: Result<Json<CreateWalletRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let request = json_body(payload)?;

    let user_id = validation::validate_user_id(&request.user_id)?;
    validation::validate_positive("balanceUpperLimit", &request.balance_upper_limit)?;
    validation::validate_positive("transactionUpperLimit", &request.transaction_upper_limit)?;

    let wallet = state
        .wallet_service
        .create_wallet(CreateWallet {
            user_id,
            balance_upper_limit: request.balance_upper_limit,
            transaction_upper_limit: request.transaction_upper_limit,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(IdResponse { id: wallet.id })))
}

#[utoipa::path(
    get,
    path = "/wallets/{id}",
    params(("id" = Uuid, Path, description = "Wallet id")),
    responses(
        (status = 200, description = "Wallet found", body = Wallet),
        (status = 404, description = "Wallet not found")
    ),
    tag = "Wallets"
)]
pub async fn get_wallet(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Wallet>, AppError> {
    let id = path_param(path, "Wallet")?;
    let wallet = state.wallet_service.get_wallet(id).await?;

    Ok(Json(wallet))
}

#[utoipa::path(
    delete,
    path = "/wallets/{id}",
    params(("id" = Uuid, Path, description = "Wallet id")),
    responses(
        (status = 204, description = "Wallet deleted"),
        (status = 404, description = "Wallet not found")
    ),
    tag = "Wallets"
)]
pub async fn delete_wallet(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let id = path_param(path, "Wallet")?;
    state.wallet_service.delete_wallet(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/wallets/{id}/transactions",
    params(("id" = Uuid, Path, description = "Wallet id")),
    request_body = CreateTransactionRequest,
    responses(
        (status = 201, description = "Transaction processed", body = IdResponse),
        (status = 400, description = "Invalid transaction type or malformed request"),
        (status = 404, description = "Wallet not found"),
        (status = 409, description = "Wallet balance changed concurrently"),
        (status = 422, description = "Limit exceeded, amount below minimum or insufficient balance")
    ),
    tag = "Transactions"
)]
pub async fn create_transaction(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<CreateTransactionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let wallet_id = path_param(path, "Wallet")?;
    let request = json_body(payload)?;
    validation::validate_positive("amount", &request.amount)?;

    let tx = state
        .wallet_service
        .create_transaction(
            wallet_id,
            CreateTransaction {
                kind: request.kind,
                amount: request.amount,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(IdResponse { id: tx.id })))
}

#[utoipa::path(
    get,
    path = "/wallets/{id}/transactions",
    params(("id" = Uuid, Path, description = "Wallet id"), ListTransactionsParams),
    responses(
        (status = 200, description = "Page of transactions in storage order", body = [Transaction]),
        (status = 400, description = "Invalid type filter or pagination"),
        (status = 404, description = "Wallet not found")
    ),
    tag = "Transactions"
)]
pub async fn list_transactions(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<ListTransactionsParams>, QueryRejection>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let wallet_id = path_param(path, "Wallet")?;
    let Query(params) = query.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let page = validation::validate_page(params.page_no, params.page_size)?;

    let transactions = state
        .wallet_service
        .get_transactions(wallet_id, params.kind.as_deref().unwrap_or(""), page)
        .await?;

    Ok(Json(transactions))
}

#[utoipa::path(
    get,
    path = "/wallets/{id}/transactions/{transactionId}",
    params(
        ("id" = Uuid, Path, description = "Wallet id"),
        ("transactionId" = Uuid, Path, description = "Transaction id")
    ),
    responses(
        (status = 200, description = "Transaction found", body = Transaction),
        (status = 404, description = "Wallet or transaction not found")
    ),
    tag = "Transactions"
)]
pub async fn get_wallet_transaction(
    State(state): State<AppState>,
    path: Result<Path<(Uuid, Uuid)>, PathRejection>,
) -> Result<Json<Transaction>, AppError> {
    let (wallet_id, transaction_id) = path_param(path, "Transaction")?;
    let tx = state
        .wallet_service
        .get_wallet_transaction(wallet_id, transaction_id)
        .await?;

    Ok(Json(tx))
}
