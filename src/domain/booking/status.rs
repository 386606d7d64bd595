//! Booking status progression.
//!
//! Lifecycle events map to target statuses here. Whether a transition is
//! enforced depends on the configured [`TransitionPolicy`]: historically any
//! caller could write any status label, so the permissive policy keeps
//! accepting everything and only reports transitions that are off the table.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::model::{BookingStatus, WorkType};
use crate::shared::errors::{DomainError, DomainResult};

/// External lifecycle event that moves a booking forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingEvent {
    CustomerCalled,
    OrderReceived,
    /// Truck and driver selection confirmed
    DriverAssigned,
    /// Pickup images / details submitted
    PickupSubmitted,
    PickupConfirmed,
    DepartedForDropoff,
    /// Dropoff images / details submitted
    DropoffSubmitted,
    /// Payment settlement screen completed
    PaymentSettled,
    Cancelled,
}

impl BookingEvent {
    /// Status an event leads to. Only dropoff depends on the work type.
    pub fn target(&self, work_type: WorkType) -> BookingStatus {
        match self {
            Self::CustomerCalled => BookingStatus::CalledToCustomer,
            Self::OrderReceived => BookingStatus::OrderReceived,
            Self::DriverAssigned => BookingStatus::OnTheWayToPickup,
            Self::PickupSubmitted => BookingStatus::VehiclePicked,
            Self::PickupConfirmed => BookingStatus::VehicleConfirmed,
            Self::DepartedForDropoff => BookingStatus::OnTheWayToDropoff,
            Self::DropoffSubmitted => match work_type {
                WorkType::PaymentWork => BookingStatus::VehicleDropped,
                WorkType::RsaWork => BookingStatus::OrderCompleted,
            },
            Self::PaymentSettled => BookingStatus::OrderCompleted,
            Self::Cancelled => BookingStatus::Cancelled,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionPolicy {
    /// Accept every transition, warn about those off the table.
    #[default]
    Permissive,
    /// Reject transitions off the table.
    Strict,
}

/// Position on the main path, `None` for labels outside it.
fn rank(status: &BookingStatus) -> Option<u8> {
    Some(match status {
        BookingStatus::BookingAdded => 0,
        BookingStatus::CalledToCustomer => 1,
        BookingStatus::OrderReceived => 2,
        BookingStatus::OnTheWayToPickup => 3,
        BookingStatus::VehiclePicked => 4,
        BookingStatus::VehicleConfirmed => 5,
        BookingStatus::OnTheWayToDropoff => 6,
        BookingStatus::VehicleDropped => 7,
        BookingStatus::OrderCompleted => 8,
        BookingStatus::Cancelled | BookingStatus::Custom(_) => return None,
    })
}

/// Whether `from -> to` is on the transition table for `work_type`.
///
/// - re-writing the current status is allowed;
/// - `Cancelled` is reachable from every non-terminal status;
/// - otherwise only forward moves along the main path, where PaymentWork must
///   pass through `Vehicle Dropped` before `Order Completed` and RSAWork never
///   visits `Vehicle Dropped`.
pub fn is_allowed(from: &BookingStatus, to: &BookingStatus, work_type: WorkType) -> bool {
    if from == to {
        return true;
    }
    if from.is_terminal() {
        return false;
    }
    if *to == BookingStatus::Cancelled {
        return true;
    }
    let (Some(f), Some(t)) = (rank(from), rank(to)) else {
        return false;
    };
    if t <= f {
        return false;
    }
    match (work_type, to) {
        (WorkType::PaymentWork, BookingStatus::OrderCompleted) => {
            *from == BookingStatus::VehicleDropped
        }
        (WorkType::RsaWork, BookingStatus::VehicleDropped) => false,
        _ => true,
    }
}

/// Applies the configured policy to status writes.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusMachine {
    policy: TransitionPolicy,
}

impl StatusMachine {
    pub fn new(policy: TransitionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    pub fn check(
        &self,
        from: &BookingStatus,
        to: &BookingStatus,
        work_type: WorkType,
    ) -> DomainResult<()> {
        if is_allowed(from, to, work_type) {
            return Ok(());
        }
        match self.policy {
            TransitionPolicy::Strict => Err(DomainError::InvalidTransition {
                from: from.to_string(),
                to: to.to_string(),
            }),
            TransitionPolicy::Permissive => {
                warn!(
                    from = %from,
                    to = %to,
                    work_type = work_type.as_str(),
                    "Status transition is off the table, accepting"
                );
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use BookingStatus::*;

    #[test]
    fn dropoff_branches_on_work_type() {
        assert_eq!(
            BookingEvent::DropoffSubmitted.target(WorkType::PaymentWork),
            VehicleDropped
        );
        assert_eq!(
            BookingEvent::DropoffSubmitted.target(WorkType::RsaWork),
            OrderCompleted
        );
        assert_eq!(
            BookingEvent::DriverAssigned.target(WorkType::RsaWork),
            OnTheWayToPickup
        );
    }

    #[test]
    fn payment_work_must_settle_before_completion() {
        assert!(is_allowed(&VehicleDropped, &OrderCompleted, WorkType::PaymentWork));
        assert!(!is_allowed(&OnTheWayToDropoff, &OrderCompleted, WorkType::PaymentWork));
    }

    #[test]
    fn rsa_work_skips_vehicle_dropped() {
        assert!(is_allowed(&OnTheWayToDropoff, &OrderCompleted, WorkType::RsaWork));
        assert!(!is_allowed(&OnTheWayToDropoff, &VehicleDropped, WorkType::RsaWork));
    }

    #[test]
    fn cancel_from_any_open_state_but_not_after_completion() {
        assert!(is_allowed(&BookingAdded, &Cancelled, WorkType::RsaWork));
        assert!(is_allowed(&VehicleDropped, &Cancelled, WorkType::PaymentWork));
        assert!(!is_allowed(&OrderCompleted, &Cancelled, WorkType::PaymentWork));
    }

    #[test]
    fn backward_and_custom_moves_are_off_table() {
        assert!(!is_allowed(&VehiclePicked, &OrderReceived, WorkType::RsaWork));
        assert!(!is_allowed(
            &VehiclePicked,
            &Custom("Waiting for crane".into()),
            WorkType::RsaWork
        ));
        assert!(is_allowed(&VehiclePicked, &VehiclePicked, WorkType::RsaWork));
    }

    #[test]
    fn permissive_policy_accepts_off_table_transitions() {
        let machine = StatusMachine::new(TransitionPolicy::Permissive);
        assert!(machine
            .check(&OrderCompleted, &BookingAdded, WorkType::PaymentWork)
            .is_ok());
    }

    #[test]
    fn strict_policy_rejects_off_table_transitions() {
        let machine = StatusMachine::new(TransitionPolicy::Strict);
        let err = machine
            .check(&OrderCompleted, &BookingAdded, WorkType::PaymentWork)
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));
        assert!(machine
            .check(&BookingAdded, &OnTheWayToPickup, WorkType::PaymentWork)
            .is_ok());
    }
}
