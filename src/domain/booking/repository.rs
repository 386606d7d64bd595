//! Booking repository interface

use async_trait::async_trait;

use super::model::{Booking, BookingStatus};
use crate::domain::money::Money;
use crate::domain::DomainResult;
use crate::shared::pagination::{PageRequest, PaginatedResult};

/// Optional filters for listing bookings.
#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
    pub driver_id: Option<String>,
    pub provider_id: Option<String>,
    pub company_id: Option<String>,
}

/// Column-level change to one booking. Only the `Some` fields are written;
/// every other column keeps whatever is stored at write time.
#[derive(Debug, Clone, Default)]
pub struct BookingPatch {
    pub status: Option<BookingStatus>,
    pub cancel_status: Option<bool>,
    pub driver_id: Option<String>,
    pub provider_id: Option<String>,
    pub showroom_id: Option<String>,
    pub company_id: Option<String>,
    pub total_amount: Option<Money>,
    pub received_amount: Option<Money>,
    pub driver_salary: Option<Money>,
    pub payable_amount_for_driver: Option<Money>,
    pub payable_amount_for_provider: Option<Money>,
    pub insurance_amount: Option<Money>,
    pub adjustment_value: Option<Money>,
    pub partial_payment: Option<bool>,
    pub partial_amount: Option<Money>,
    pub cash_pending: Option<bool>,
    pub approve: Option<bool>,
    pub verified: Option<bool>,
    pub accountant_verified: Option<bool>,
}

impl BookingPatch {
    /// Status change, raising `cancel_status` when the target is `Cancelled`.
    pub fn status(status: BookingStatus) -> Self {
        Self {
            cancel_status: (status == BookingStatus::Cancelled).then_some(true),
            status: Some(status),
            ..Default::default()
        }
    }
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn save(&self, booking: Booking) -> DomainResult<()>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Booking>>;
    async fn find_by_file_number(&self, file_number: &str) -> DomainResult<Option<Booking>>;
    /// Write the fields set in `patch` and return the stored booking.
    async fn patch(&self, id: &str, patch: BookingPatch) -> DomainResult<Booking>;
    /// Add `amount` to the transferred salary of a booking in one statement.
    /// Fails with `Conflict` when that would exceed the booking's salary.
    async fn add_transfered_salary(&self, id: &str, amount: Money) -> DomainResult<()>;
    /// Newest first.
    async fn list(
        &self,
        filter: &BookingFilter,
        page: PageRequest,
    ) -> DomainResult<PaginatedResult<Booking>>;
    /// Verified bookings of a driver whose salary is not fully transferred,
    /// oldest first.
    async fn find_with_unpaid_salary(&self, driver_id: &str) -> DomainResult<Vec<Booking>>;
}
