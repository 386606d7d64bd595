//! Advance ledger and salary transfer DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::SalaryTransfer;
use crate::domain::ledger::{Advance, CorrectionLine, SalaryTransaction};
use crate::interfaces::http::modules::actors::ActorResponse;

/// Per-booking line of a correction or salary allocation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CorrectionLineDto {
    pub file_number: String,
    #[schema(value_type = String)]
    pub driver_salary: Decimal,
    #[schema(value_type = String)]
    pub balance_salary: Decimal,
    #[schema(value_type = String)]
    pub transfered_salary: Decimal,
}

impl From<CorrectionLine> for CorrectionLineDto {
    fn from(l: CorrectionLine) -> Self {
        Self {
            file_number: l.file_number,
            driver_salary: l.driver_salary.to_decimal(),
            balance_salary: l.balance_salary.to_decimal(),
            transfered_salary: l.transfered_salary.to_decimal(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdvanceResponse {
    pub id: String,
    pub actor_kind: String,
    pub actor_id: String,
    #[schema(value_type = String)]
    pub added_advance: Decimal,
    #[schema(value_type = String)]
    pub advance: Decimal,
    /// Cash in hand of the actor when the entry was written
    #[schema(value_type = String)]
    pub cash_in_hand: Decimal,
    pub advance_type: String,
    pub remark: Option<String>,
    pub lines: Vec<CorrectionLineDto>,
    pub created_at: DateTime<Utc>,
}

impl From<Advance> for AdvanceResponse {
    fn from(a: Advance) -> Self {
        Self {
            id: a.id,
            actor_kind: a.actor.kind.as_str().to_string(),
            actor_id: a.actor.id,
            added_advance: a.added_advance.to_decimal(),
            advance: a.advance.to_decimal(),
            cash_in_hand: a.cash_in_hand.to_decimal(),
            advance_type: a.advance_type.as_str().to_string(),
            remark: a.remark,
            lines: a.lines.into_iter().map(Into::into).collect(),
            created_at: a.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAdvanceRequest {
    /// `Driver` or `Provider`
    pub actor_kind: String,
    #[validate(length(min = 1))]
    pub actor_id: String,
    #[schema(value_type = String)]
    pub amount: Decimal,
    /// Defaults to `Advance`
    pub advance_type: Option<String>,
    #[validate(length(max = 500))]
    pub remark: Option<String>,
}

/// The advance entry and the actor snapshot it produced
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdvanceWithActorResponse {
    pub advance: AdvanceResponse,
    pub actor: ActorResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MonthlyAdvanceResponse {
    pub driver_id: String,
    #[schema(value_type = String)]
    pub monthly_advance: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TransferSalaryRequest {
    #[validate(length(min = 1))]
    pub driver_id: String,
    /// External payment reference, unique per driver
    #[validate(length(min = 1, max = 64))]
    pub transaction_id: String,
    #[schema(value_type = String)]
    pub amount: Decimal,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SalaryTransactionResponse {
    pub id: String,
    pub actor_kind: String,
    pub actor_id: String,
    pub transaction_id: String,
    #[schema(value_type = String)]
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<SalaryTransaction> for SalaryTransactionResponse {
    fn from(t: SalaryTransaction) -> Self {
        Self {
            id: t.id,
            actor_kind: t.actor.kind.as_str().to_string(),
            actor_id: t.actor.id,
            transaction_id: t.transaction_id,
            amount: t.amount.to_decimal(),
            created_at: t.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SalaryTransferResponse {
    pub transaction: SalaryTransactionResponse,
    /// Allocation over the driver's bookings, oldest first
    pub lines: Vec<CorrectionLineDto>,
    pub driver: ActorResponse,
}

impl From<SalaryTransfer> for SalaryTransferResponse {
    fn from(t: SalaryTransfer) -> Self {
        Self {
            transaction: t.transaction.into(),
            lines: t.lines.into_iter().map(Into::into).collect(),
            driver: t.driver.into(),
        }
    }
}
