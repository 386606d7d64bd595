//! Booking DTOs
//!
//! Amounts travel as decimal strings or numbers (`"1250.50"`, `1250.5`) and
//! are parsed into minor units by the handlers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::booking::{Booking, BookingEvent};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookingResponse {
    pub id: String,
    pub file_number: String,
    /// `RSAWork` or `PaymentWork`
    pub work_type: String,
    /// Status label, e.g. `Order Completed`
    pub status: String,
    pub driver_id: Option<String>,
    pub provider_id: Option<String>,
    pub showroom_id: Option<String>,
    pub company_id: Option<String>,
    pub created_by_kind: Option<String>,
    pub created_by_id: Option<String>,
    #[schema(value_type = String)]
    pub total_amount: Decimal,
    #[schema(value_type = String)]
    pub received_amount: Decimal,
    #[schema(value_type = String)]
    pub driver_salary: Decimal,
    #[schema(value_type = String)]
    pub transfered_salary: Decimal,
    #[schema(value_type = String)]
    pub payable_amount_for_driver: Decimal,
    #[schema(value_type = String)]
    pub payable_amount_for_provider: Decimal,
    #[schema(value_type = String)]
    pub insurance_amount: Decimal,
    #[schema(value_type = String)]
    pub adjustment_value: Decimal,
    pub partial_payment: bool,
    #[schema(value_type = String)]
    pub partial_amount: Decimal,
    pub cash_pending: Option<bool>,
    pub approve: bool,
    pub verified: bool,
    pub accountant_verified: bool,
    pub cancel_status: bool,
    /// Approved and accountant verified
    pub invoice_eligible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(b: Booking) -> Self {
        let invoice_eligible = b.is_invoice_eligible();
        let (created_by_kind, created_by_id) = match b.created_by {
            Some(c) => (Some(c.kind.as_str().to_string()), Some(c.id)),
            None => (None, None),
        };
        Self {
            id: b.id,
            file_number: b.file_number,
            work_type: b.work_type.as_str().to_string(),
            status: b.status.as_str().to_string(),
            driver_id: b.driver_id,
            provider_id: b.provider_id,
            showroom_id: b.showroom_id,
            company_id: b.company_id,
            created_by_kind,
            created_by_id,
            total_amount: b.total_amount.to_decimal(),
            received_amount: b.received_amount.to_decimal(),
            driver_salary: b.driver_salary.to_decimal(),
            transfered_salary: b.transfered_salary.to_decimal(),
            payable_amount_for_driver: b.payable_amount_for_driver.to_decimal(),
            payable_amount_for_provider: b.payable_amount_for_provider.to_decimal(),
            insurance_amount: b.insurance_amount.to_decimal(),
            adjustment_value: b.adjustment_value.to_decimal(),
            partial_payment: b.partial_payment,
            partial_amount: b.partial_amount.to_decimal(),
            cash_pending: b.cash_pending,
            approve: b.approve,
            verified: b.verified,
            accountant_verified: b.accountant_verified,
            cancel_status: b.cancel_status,
            invoice_eligible,
            created_at: b.created_at,
            updated_at: b.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    #[validate(length(min = 1, max = 64, message = "file number is required"))]
    pub file_number: String,
    /// `RSAWork` or `PaymentWork`
    pub work_type: String,
    pub driver_id: Option<String>,
    pub provider_id: Option<String>,
    pub showroom_id: Option<String>,
    pub company_id: Option<String>,
    /// `Showroom`, `ShowroomStaff`, `Admin` or `Staff`
    pub created_by_kind: Option<String>,
    pub created_by_id: Option<String>,
    #[schema(value_type = String)]
    pub total_amount: Decimal,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub driver_salary: Decimal,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub payable_amount_for_driver: Decimal,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub payable_amount_for_provider: Decimal,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub insurance_amount: Decimal,
    /// May be negative
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub adjustment_value: Decimal,
}

/// Fields left out are unchanged.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBookingRequest {
    /// Free-text status label; known labels are matched exactly
    #[validate(length(min = 1, max = 120))]
    pub status: Option<String>,
    pub driver_id: Option<String>,
    pub provider_id: Option<String>,
    pub showroom_id: Option<String>,
    pub company_id: Option<String>,
    #[schema(value_type = Option<String>)]
    pub total_amount: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub driver_salary: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub payable_amount_for_driver: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub payable_amount_for_provider: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub insurance_amount: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub adjustment_value: Option<Decimal>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BookingEventRequest {
    /// One of `customer_called`, `order_received`, `driver_assigned`,
    /// `pickup_submitted`, `pickup_confirmed`, `departed_for_dropoff`,
    /// `dropoff_submitted`, `payment_settled`, `cancelled`
    #[schema(value_type = String)]
    pub event: BookingEvent,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SettleAmountRequest {
    #[schema(value_type = String)]
    pub received_amount: Decimal,
    /// Collected ahead of completion; positive marks the booking partially paid
    #[schema(value_type = Option<String>)]
    pub partial_amount: Option<Decimal>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ApproveRequest {
    pub approve: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VerifyRequest {
    pub verified: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AccountantVerifyRequest {
    pub accountant_verified: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CashPendingRequest {
    pub cash_pending: bool,
}

/// Optional list filters
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct BookingFilterParams {
    /// Exact status label
    pub status: Option<String>,
    pub driver_id: Option<String>,
    pub provider_id: Option<String>,
    pub company_id: Option<String>,
}
