//! Actor DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::actor::{Actor, FinancialSnapshot};

/// Cached figures as of the last reconciliation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SnapshotResponse {
    #[schema(value_type = String)]
    pub cash_in_hand: Decimal,
    #[schema(value_type = String)]
    pub salary: Decimal,
    /// Drivers may go negative; providers are clamped at zero
    #[schema(value_type = String)]
    pub balance: Decimal,
    #[schema(value_type = String)]
    pub monthly_diesel_expense: Decimal,
    #[schema(value_type = String)]
    pub monthly_expense: Decimal,
    #[schema(value_type = String)]
    pub total_expense: Decimal,
    #[schema(value_type = String)]
    pub monthly_salary: Decimal,
    #[schema(value_type = String)]
    pub monthly_advance: Decimal,
}

impl From<FinancialSnapshot> for SnapshotResponse {
    fn from(s: FinancialSnapshot) -> Self {
        Self {
            cash_in_hand: s.cash_in_hand.to_decimal(),
            salary: s.salary.to_decimal(),
            balance: s.balance.to_decimal(),
            monthly_diesel_expense: s.monthly.diesel_expense.to_decimal(),
            monthly_expense: s.monthly.expense.to_decimal(),
            total_expense: s.monthly.total_expense.to_decimal(),
            monthly_salary: s.monthly.salary.to_decimal(),
            monthly_advance: s.monthly.advance.to_decimal(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActorResponse {
    pub id: String,
    /// `Driver`, `Provider` or `Company`
    pub kind: String,
    pub name: String,
    pub phone: Option<String>,
    pub snapshot: SnapshotResponse,
    pub reconciled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Actor> for ActorResponse {
    fn from(a: Actor) -> Self {
        Self {
            id: a.id,
            kind: a.kind.as_str().to_string(),
            name: a.name,
            phone: a.phone,
            snapshot: a.snapshot.into(),
            reconciled_at: a.reconciled_at,
            created_at: a.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterActorRequest {
    #[validate(length(min = 1, max = 120, message = "name is required"))]
    pub name: String,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
}
