//! Expense DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::expense::{DieselExpense, Expense};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ExpenseResponse {
    pub id: String,
    pub driver_id: String,
    #[schema(value_type = String)]
    pub amount: Decimal,
    pub description: Option<String>,
    pub approve: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Expense> for ExpenseResponse {
    fn from(e: Expense) -> Self {
        Self {
            id: e.id,
            driver_id: e.driver_id,
            amount: e.amount.to_decimal(),
            description: e.description,
            approve: e.approve,
            created_at: e.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DieselExpenseResponse {
    pub id: String,
    pub driver_id: String,
    #[schema(value_type = String)]
    pub amount: Decimal,
    /// `Pending`, `Approved` or `Rejected`
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<DieselExpense> for DieselExpenseResponse {
    fn from(d: DieselExpense) -> Self {
        Self {
            id: d.id,
            driver_id: d.driver_id,
            amount: d.amount.to_decimal(),
            status: d.status.as_str().to_string(),
            created_at: d.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RecordExpenseRequest {
    #[validate(length(min = 1))]
    pub driver_id: String,
    #[schema(value_type = String)]
    pub amount: Decimal,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ExpenseApprovalRequest {
    pub approve: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RecordDieselRequest {
    #[validate(length(min = 1))]
    pub driver_id: String,
    #[schema(value_type = String)]
    pub amount: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DieselStatusRequest {
    /// `Pending`, `Approved` or `Rejected`
    pub status: String,
}
