//! Mapping of domain failures onto HTTP responses

use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;

use super::ApiResponse;
use crate::domain::{DomainError, Money};

/// Error half of every handler result.
pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

pub fn status_for(e: &DomainError) -> StatusCode {
    match e {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::Conflict(_)
        | DomainError::BusinessRule(_)
        | DomainError::InvalidTransition { .. } => StatusCode::CONFLICT,
        DomainError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Database details are logged, never returned to the client.
pub fn domain_error(e: DomainError) -> ApiError {
    let status = status_for(&e);
    let message = match &e {
        DomainError::Database(detail) => {
            tracing::error!(error = %detail, "Request failed with a database error");
            "Internal server error".to_string()
        }
        other => other.to_string(),
    };
    (status, Json(ApiResponse::error(message)))
}

fn invalid_amount(field: &str, reason: impl std::fmt::Display) -> ApiError {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiResponse::error(format!("{}: {}", field, reason))),
    )
}

/// Parse a request amount that must not be negative.
pub fn money_field(field: &str, value: Decimal) -> Result<Money, ApiError> {
    Money::non_negative(value).map_err(|e| invalid_amount(field, e))
}

/// Parse a request amount that may be negative (adjustments).
pub fn money_field_signed(field: &str, value: Decimal) -> Result<Money, ApiError> {
    Money::try_from(value).map_err(|e| invalid_amount(field, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn statuses_per_error_kind() {
        assert_eq!(
            status_for(&DomainError::not_found("Booking", "x")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&DomainError::BusinessRule("open balance".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&DomainError::InvalidTransition {
                from: "Order Completed".into(),
                to: "Vehicle Picked".into(),
            }),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn database_detail_is_hidden() {
        let (status, Json(body)) = domain_error(DomainError::Database("disk I/O error".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.as_deref(), Some("Internal server error"));
    }

    #[test]
    fn amounts_are_checked_per_field() {
        let ok = money_field("total_amount", Decimal::from_str("1250.50").unwrap()).unwrap();
        assert_eq!(ok, Money::from_minor(125_050));

        let (status, Json(body)) =
            money_field("total_amount", Decimal::from_str("-1").unwrap()).unwrap_err();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.error.unwrap().starts_with("total_amount:"));

        assert!(money_field("x", Decimal::from_str("0.001").unwrap()).is_err());
        assert_eq!(
            money_field_signed("adjustment_value", Decimal::from_str("-25").unwrap()).unwrap(),
            Money::from_major(-25)
        );
    }
}
