use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::services::ServiceError;
use crate::validation::ValidationError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::WalletNotFound(_) | ServiceError::TransactionNotFound(_) => {
                AppError::NotFound(err.to_string())
            }
            ServiceError::InvalidType(_) => AppError::BadRequest(err.to_string()),
            ServiceError::DuplicateOwner(_)
            | ServiceError::LimitExceeded(_)
            | ServiceError::BelowMinimum { .. }
            | ServiceError::InsufficientBalance { .. } => AppError::Unprocessable(err.to_string()),
            ServiceError::ConcurrentModification(_) => AppError::Conflict(err.to_string()),
            ServiceError::Repository(e) => {
                tracing::error!(error = %e, "Store operation failed");
                AppError::Internal(e.to_string())
            }
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::InvalidTransactionType;
    use crate::ports::RepositoryError;
    use bigdecimal::BigDecimal;
    use uuid::Uuid;

    #[test]
    fn test_validation_error_status_code() {
        let error = AppError::Validation("Invalid input".to_string());
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_error_status_code() {
        let error = AppError::NotFound("Resource not found".to_string());
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_unprocessable_error_status_code() {
        let error = AppError::Unprocessable("Limit exceeded".to_string());
        assert_eq!(error.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_service_errors_map_to_status_codes() {
        let cases = [
            (ServiceError::WalletNotFound(Uuid::nil()), StatusCode::NOT_FOUND),
            (ServiceError::TransactionNotFound(Uuid::nil()), StatusCode::NOT_FOUND),
            (
                ServiceError::InvalidType(InvalidTransactionType("refund".to_string())),
                StatusCode::BAD_REQUEST,
            ),
            (
                ServiceError::DuplicateOwner("1".to_string()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ServiceError::LimitExceeded("too much".to_string()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ServiceError::BelowMinimum {
                    amount: BigDecimal::from(0),
                    minimum: BigDecimal::from(1),
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ServiceError::InsufficientBalance {
                    balance: BigDecimal::from(0),
                    amount: BigDecimal::from(1),
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ServiceError::ConcurrentModification(Uuid::nil()),
                StatusCode::CONFLICT,
            ),
            (
                ServiceError::Repository(RepositoryError::Database(sqlx::Error::PoolTimedOut)),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (service_error, expected) in cases {
            assert_eq!(AppError::from(service_error).status_code(), expected);
        }
    }

    #[tokio::test]
    async fn test_error_response_body() {
        let error = AppError::NotFound("Wallet not found".to_string());
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], 404);
        assert_eq!(body["error"], "Not found: Wallet not found");
    }
}
