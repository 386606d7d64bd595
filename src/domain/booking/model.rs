//! Booking domain entity

use std::fmt;

use chrono::{DateTime, Utc};

use crate::domain::money::Money;

/// Booking category; decides which status path and settlement flow applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkType {
    /// Roadside assistance billed to a company, no customer payment step.
    RsaWork,
    /// Customer pays on delivery; goes through payment settlement.
    PaymentWork,
}

impl WorkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RsaWork => "RSAWork",
            Self::PaymentWork => "PaymentWork",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "RSAWork" => Some(Self::RsaWork),
            "PaymentWork" => Some(Self::PaymentWork),
            _ => None,
        }
    }
}

/// Booking status label.
///
/// The stored value is free text; the known labels get their own variant and
/// anything else is carried verbatim in `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BookingStatus {
    BookingAdded,
    CalledToCustomer,
    OrderReceived,
    OnTheWayToPickup,
    VehiclePicked,
    VehicleConfirmed,
    OnTheWayToDropoff,
    VehicleDropped,
    OrderCompleted,
    Cancelled,
    Custom(String),
}

impl BookingStatus {
    pub const KNOWN: [BookingStatus; 10] = [
        Self::BookingAdded,
        Self::CalledToCustomer,
        Self::OrderReceived,
        Self::OnTheWayToPickup,
        Self::VehiclePicked,
        Self::VehicleConfirmed,
        Self::OnTheWayToDropoff,
        Self::VehicleDropped,
        Self::OrderCompleted,
        Self::Cancelled,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::BookingAdded => "Booking Added",
            Self::CalledToCustomer => "called to customer",
            Self::OrderReceived => "Order Received",
            Self::OnTheWayToPickup => "On the way to pickup location",
            Self::VehiclePicked => "Vehicle Picked",
            Self::VehicleConfirmed => "Vehicle Confirmed",
            Self::OnTheWayToDropoff => "On the way to dropoff location",
            Self::VehicleDropped => "Vehicle Dropped",
            Self::OrderCompleted => "Order Completed",
            Self::Cancelled => "Cancelled",
            Self::Custom(label) => label,
        }
    }

    /// Map a stored label back to a status. Unknown labels become `Custom`.
    pub fn from_label(label: &str) -> Self {
        Self::KNOWN
            .iter()
            .find(|s| s.as_str() == label)
            .cloned()
            .unwrap_or_else(|| Self::Custom(label.to_string()))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::OrderCompleted | Self::Cancelled)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who created a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreatorKind {
    Showroom,
    ShowroomStaff,
    Admin,
    Staff,
}

impl CreatorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Showroom => "Showroom",
            Self::ShowroomStaff => "ShowroomStaff",
            Self::Admin => "Admin",
            Self::Staff => "Staff",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Showroom" => Some(Self::Showroom),
            "ShowroomStaff" => Some(Self::ShowroomStaff),
            "Admin" => Some(Self::Admin),
            "Staff" => Some(Self::Staff),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Creator {
    pub kind: CreatorKind,
    pub id: String,
}

/// Input for a new booking.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub file_number: String,
    pub work_type: WorkType,
    pub driver_id: Option<String>,
    pub provider_id: Option<String>,
    pub showroom_id: Option<String>,
    pub company_id: Option<String>,
    pub created_by: Option<Creator>,
    pub total_amount: Money,
    pub driver_salary: Money,
    pub payable_amount_for_driver: Money,
    pub payable_amount_for_provider: Money,
    pub insurance_amount: Money,
    pub adjustment_value: Money,
}

/// One roadside-assistance / logistics job.
#[derive(Debug, Clone)]
pub struct Booking {
    pub id: String,
    pub file_number: String,
    pub driver_id: Option<String>,
    pub provider_id: Option<String>,
    pub showroom_id: Option<String>,
    pub company_id: Option<String>,
    pub created_by: Option<Creator>,
    /// Amount owed by the customer or company
    pub total_amount: Money,
    /// Amount collected so far
    pub received_amount: Money,
    pub driver_salary: Money,
    /// Portion of `driver_salary` already paid out
    pub transfered_salary: Money,
    pub payable_amount_for_driver: Money,
    pub payable_amount_for_provider: Money,
    pub insurance_amount: Money,
    pub adjustment_value: Money,
    pub partial_payment: bool,
    pub partial_amount: Money,
    pub status: BookingStatus,
    pub work_type: WorkType,
    /// `None` means never set, which the cash aggregation treats like `false`.
    pub cash_pending: Option<bool>,
    pub approve: bool,
    pub verified: bool,
    pub accountant_verified: bool,
    pub cancel_status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(input: NewBooking) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            file_number: input.file_number,
            driver_id: input.driver_id,
            provider_id: input.provider_id,
            showroom_id: input.showroom_id,
            company_id: input.company_id,
            created_by: input.created_by,
            total_amount: input.total_amount,
            received_amount: Money::ZERO,
            driver_salary: input.driver_salary,
            transfered_salary: Money::ZERO,
            payable_amount_for_driver: input.payable_amount_for_driver,
            payable_amount_for_provider: input.payable_amount_for_provider,
            insurance_amount: input.insurance_amount,
            adjustment_value: input.adjustment_value,
            partial_payment: false,
            partial_amount: Money::ZERO,
            status: BookingStatus::BookingAdded,
            work_type: input.work_type,
            cash_pending: None,
            approve: false,
            verified: false,
            accountant_verified: false,
            cancel_status: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// What the customer or company still owes.
    pub fn outstanding(&self) -> Money {
        self.total_amount - self.received_amount
    }

    /// Driver salary not yet transferred. Zero until the booking is verified.
    pub fn unpaid_salary(&self) -> Money {
        if self.verified {
            self.driver_salary - self.transfered_salary
        } else {
            Money::ZERO
        }
    }

    pub fn is_invoice_eligible(&self) -> bool {
        self.approve && self.accountant_verified
    }

    pub fn is_completed(&self) -> bool {
        self.status == BookingStatus::OrderCompleted
    }

    /// Set the status label. Cancelling also raises `cancel_status`.
    pub fn set_status(&mut self, status: BookingStatus) {
        if status == BookingStatus::Cancelled {
            self.cancel_status = true;
        }
        self.status = status;
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Booking {
        Booking::new(NewBooking {
            file_number: "RSA-0001".into(),
            work_type: WorkType::PaymentWork,
            driver_id: Some("driver-1".into()),
            provider_id: None,
            showroom_id: None,
            company_id: None,
            created_by: None,
            total_amount: Money::from_major(1000),
            driver_salary: Money::from_major(300),
            payable_amount_for_driver: Money::ZERO,
            payable_amount_for_provider: Money::ZERO,
            insurance_amount: Money::ZERO,
            adjustment_value: Money::ZERO,
        })
    }

    #[test]
    fn new_booking_starts_added_and_unsettled() {
        let b = sample();
        assert_eq!(b.status, BookingStatus::BookingAdded);
        assert_eq!(b.outstanding(), Money::from_major(1000));
        assert_eq!(b.cash_pending, None);
        assert!(!b.is_invoice_eligible());
    }

    #[test]
    fn unpaid_salary_requires_verification() {
        let mut b = sample();
        b.transfered_salary = Money::from_major(100);
        assert_eq!(b.unpaid_salary(), Money::ZERO);
        b.verified = true;
        assert_eq!(b.unpaid_salary(), Money::from_major(200));
    }

    #[test]
    fn cancelling_sets_cancel_status() {
        let mut b = sample();
        b.set_status(BookingStatus::Cancelled);
        assert!(b.cancel_status);
        assert!(b.status.is_terminal());
    }

    #[test]
    fn status_labels_roundtrip_and_unknown_is_custom() {
        for s in BookingStatus::KNOWN.iter() {
            assert_eq!(&BookingStatus::from_label(s.as_str()), s);
        }
        assert_eq!(
            BookingStatus::from_label("Waiting for crane"),
            BookingStatus::Custom("Waiting for crane".into())
        );
    }

    #[test]
    fn invoice_eligibility_needs_both_flags() {
        let mut b = sample();
        b.approve = true;
        assert!(!b.is_invoice_eligible());
        b.accountant_verified = true;
        assert!(b.is_invoice_eligible());
    }
}
