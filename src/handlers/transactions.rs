use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};
use uuid::Uuid;

use crate::AppState;
use crate::domain::Transaction;
use crate::error::AppError;
use crate::handlers::path_param;

#[utoipa::path(
    get,
    path = "/transactions/{id}",
    params(("id" = Uuid, Path, description = "Transaction id")),
    responses(
        (status = 200, description = "Transaction found", body = Transaction),
        (status = 404, description = "Transaction not found")
    ),
    tag = "Transactions"
)]
pub async fn get_transaction(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Transaction>, AppError> {
    let id = path_param(path, "Transaction")?;
    let tx = state.transaction_service.get_transaction(id).await?;

    Ok(Json(tx))
}
