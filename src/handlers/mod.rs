pub mod transactions;
pub mod wallets;

use crate::AppState;
use crate::error::AppError;
use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
    http::StatusCode,
    response::IntoResponse,
};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

/// Body returned by the create endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct IdResponse {
    pub id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub storage: String,
}

/// Reads an amount from a JSON number or a numeric string. Numbers are
/// parsed from their JSON text so `0.1` stays `0.1` instead of the
/// expansion of the nearest `f64`.
pub(crate) fn deserialize_amount<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n.to_string().parse().map_err(de::Error::custom),
        Value::String(s) => s.parse().map_err(de::Error::custom),
        other => Err(de::Error::custom(format!(
            "expected a number or a numeric string, found {}",
            other
        ))),
    }
}

/// A malformed id cannot name an existing resource, so it reads as 404.
pub(crate) fn path_param<T>(
    path: Result<Path<T>, PathRejection>,
    resource: &str,
) -> Result<T, AppError> {
    path.map(|Path(value)| value).map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected path parameter");
        AppError::NotFound(format!("{} not found", resource))
    })
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthStatus),
        (status = 503, description = "Service is unhealthy", body = HealthStatus)
    ),
    tag = "Health"
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let (storage, healthy) = match &state.db {
        Some(pool) => match sqlx::query("SELECT 1").execute(pool).await {
            Ok(_) => ("connected", true),
            Err(e) => {
                tracing::warn!(error = %e, "Health check could not reach the database");
                ("disconnected", false)
            }
        },
        None => ("in-memory", true),
    };

    let health_response = HealthStatus {
        status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage: storage.to_string(),
    };

    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(health_response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Amount {
        #[serde(deserialize_with = "deserialize_amount")]
        amount: BigDecimal,
    }

    fn parse(body: &str) -> Result<BigDecimal, serde_json::Error> {
        serde_json::from_str::<Amount>(body).map(|a| a.amount)
    }

    #[test]
    fn test_amount_keeps_the_digits_sent() {
        assert_eq!(parse(r#"{"amount": 0.1}"#).unwrap().to_string(), "0.1");
        assert_eq!(parse(r#"{"amount": 1000}"#).unwrap().to_string(), "1000");
        assert_eq!(parse(r#"{"amount": "120.50"}"#).unwrap().to_string(), "120.50");
        assert_eq!(parse(r#"{"amount": 12.5}"#).unwrap(), "12.5".parse().unwrap());
    }

    #[test]
    fn test_amount_rejects_non_numeric_values() {
        assert!(parse(r#"{"amount": "ten"}"#).is_err());
        assert!(parse(r#"{"amount": true}"#).is_err());
        assert!(parse(r#"{"amount": null}"#).is_err());
    }
}
