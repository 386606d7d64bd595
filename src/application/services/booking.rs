//! Booking service
//!
//! Write path for bookings: intake, field and status updates, settlement,
//! the side flags and salary transfers. Every write that changes an
//! aggregation input reconciles the booking's parties afterwards.

use std::sync::Arc;

use tracing::info;

use super::ledger::LedgerService;
use super::reconciliation::ReconciliationService;
use crate::application::locks::ActorLocks;
use crate::domain::actor::{Actor, ActorRef};
use crate::domain::booking::{
    Booking, BookingEvent, BookingFilter, BookingPatch, BookingStatus, NewBooking,
    StatusMachine, TransitionPolicy,
};
use crate::domain::ledger::{Advance, AdvanceType, CorrectionLine, SalaryTransaction};
use crate::domain::money::Money;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::pagination::{PageRequest, PaginatedResult};

/// Partial update of a booking. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct BookingUpdate {
    pub status: Option<BookingStatus>,
    pub driver_id: Option<String>,
    pub provider_id: Option<String>,
    pub showroom_id: Option<String>,
    pub company_id: Option<String>,
    pub total_amount: Option<Money>,
    pub driver_salary: Option<Money>,
    pub payable_amount_for_driver: Option<Money>,
    pub payable_amount_for_provider: Option<Money>,
    pub insurance_amount: Option<Money>,
    pub adjustment_value: Option<Money>,
}

/// Amounts collected on a booking.
#[derive(Debug, Clone, Copy)]
pub struct Settlement {
    pub received_amount: Money,
    /// Amount collected ahead of completion; a positive value flags the
    /// booking as partially paid.
    pub partial_amount: Option<Money>,
}

/// Result of a salary transfer.
#[derive(Debug, Clone)]
pub struct SalaryTransfer {
    pub transaction: SalaryTransaction,
    pub lines: Vec<CorrectionLine>,
    pub driver: Actor,
}

pub struct BookingService {
    repos: Arc<dyn RepositoryProvider>,
    reconciliation: Arc<ReconciliationService>,
    ledger: Arc<LedgerService>,
    machine: StatusMachine,
    /// Held for a whole salary transfer. Distinct from the reconciliation
    /// locks, which the transfer takes again when it reconciles the driver.
    transfers: ActorLocks,
}

impl BookingService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        reconciliation: Arc<ReconciliationService>,
        ledger: Arc<LedgerService>,
        policy: TransitionPolicy,
    ) -> Self {
        Self {
            repos,
            reconciliation,
            ledger,
            machine: StatusMachine::new(policy),
            transfers: ActorLocks::new(),
        }
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.machine.policy()
    }

    pub async fn create(&self, input: NewBooking) -> DomainResult<Booking> {
        if input.file_number.trim().is_empty() {
            return Err(DomainError::Validation("file number is required".into()));
        }
        if self
            .repos
            .bookings()
            .find_by_file_number(&input.file_number)
            .await?
            .is_some()
        {
            return Err(DomainError::Conflict(format!(
                "booking with file number {} already exists",
                input.file_number
            )));
        }

        let booking = Booking::new(input);
        self.repos.bookings().save(booking.clone()).await?;

        info!(
            booking_id = %booking.id,
            file_number = %booking.file_number,
            work_type = booking.work_type.as_str(),
            "Booking created"
        );
        Ok(booking)
    }

    pub async fn get(&self, id: &str) -> DomainResult<Booking> {
        self.repos
            .bookings()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Booking", id))
    }

    pub async fn list(
        &self,
        filter: &BookingFilter,
        page: PageRequest,
    ) -> DomainResult<PaginatedResult<Booking>> {
        self.repos.bookings().list(filter, page).await
    }

    pub async fn update(&self, id: &str, changes: BookingUpdate) -> DomainResult<Booking> {
        let before = self.get(id).await?;
        let mut patch = BookingPatch::default();

        if let Some(status) = changes.status {
            self.machine
                .check(&before.status, &status, before.work_type)?;
            patch = BookingPatch::status(status);
        }
        if let Some(v) = changes.total_amount {
            if v < before.received_amount {
                return Err(DomainError::Validation(format!(
                    "total amount {} is below the received amount {}",
                    v, before.received_amount
                )));
            }
            patch.total_amount = Some(v);
        }
        patch.driver_id = changes.driver_id;
        patch.provider_id = changes.provider_id;
        patch.showroom_id = changes.showroom_id;
        patch.company_id = changes.company_id;
        patch.driver_salary = changes.driver_salary;
        patch.payable_amount_for_driver = changes.payable_amount_for_driver;
        patch.payable_amount_for_provider = changes.payable_amount_for_provider;
        patch.insurance_amount = changes.insurance_amount;
        patch.adjustment_value = changes.adjustment_value;

        let booking = self.repos.bookings().patch(id, patch).await?;
        info!(booking_id = %booking.id, status = %booking.status, "Booking updated");

        if parties(&before) != parties(&booking) {
            self.reconciliation.reconcile_booking_parties(&before).await?;
        }
        self.reconciliation
            .reconcile_booking_parties(&booking)
            .await?;
        Ok(booking)
    }

    /// Move a booking along its lifecycle.
    pub async fn apply_event(&self, id: &str, event: BookingEvent) -> DomainResult<Booking> {
        let current = self.get(id).await?;
        let from = current.status.clone();
        let to = event.target(current.work_type);

        self.machine.check(&from, &to, current.work_type)?;
        let booking = self
            .repos
            .bookings()
            .patch(id, BookingPatch::status(to))
            .await?;

        info!(
            booking_id = %booking.id,
            event = ?event,
            from = %from,
            to = %booking.status,
            "Booking status changed"
        );

        if (from == BookingStatus::OrderCompleted) != booking.is_completed() {
            self.reconciliation
                .reconcile_booking_parties(&booking)
                .await?;
        }
        Ok(booking)
    }

    /// Record collected amounts. The received amount may not exceed the total.
    pub async fn settle(&self, id: &str, settlement: Settlement) -> DomainResult<Booking> {
        let current = self.get(id).await?;

        let received = settlement.received_amount;
        if received.is_negative() || received > current.total_amount {
            return Err(DomainError::Validation(format!(
                "received amount {} must be between 0 and the total amount {}",
                received, current.total_amount
            )));
        }
        let mut patch = BookingPatch {
            received_amount: Some(received),
            ..Default::default()
        };

        if let Some(partial) = settlement.partial_amount {
            if partial.is_negative() {
                return Err(DomainError::Validation(
                    "partial amount must not be negative".into(),
                ));
            }
            patch.partial_payment = Some(partial.is_positive());
            patch.partial_amount = Some(partial);
        }

        let booking = self.repos.bookings().patch(id, patch).await?;
        info!(
            booking_id = %booking.id,
            received = %booking.received_amount,
            outstanding = %booking.outstanding(),
            "Booking settled"
        );

        self.reconciliation
            .reconcile_booking_parties(&booking)
            .await?;
        Ok(booking)
    }

    /// Approval requires the booking to be fully paid.
    pub async fn set_approve(&self, id: &str, approve: bool) -> DomainResult<Booking> {
        let current = self.get(id).await?;
        if approve && !current.outstanding().is_zero() {
            return Err(DomainError::BusinessRule(format!(
                "booking {} still has {} outstanding",
                current.file_number,
                current.outstanding()
            )));
        }
        let booking = self
            .repos
            .bookings()
            .patch(
                id,
                BookingPatch {
                    approve: Some(approve),
                    ..Default::default()
                },
            )
            .await?;
        info!(booking_id = %booking.id, approve, "Booking approval set");
        Ok(booking)
    }

    pub async fn set_verified(&self, id: &str, verified: bool) -> DomainResult<Booking> {
        let booking = self
            .repos
            .bookings()
            .patch(
                id,
                BookingPatch {
                    verified: Some(verified),
                    ..Default::default()
                },
            )
            .await?;
        info!(booking_id = %booking.id, verified, "Booking verification set");

        self.reconciliation
            .reconcile_booking_parties(&booking)
            .await?;
        Ok(booking)
    }

    pub async fn set_accountant_verified(
        &self,
        id: &str,
        accountant_verified: bool,
    ) -> DomainResult<Booking> {
        let booking = self
            .repos
            .bookings()
            .patch(
                id,
                BookingPatch {
                    accountant_verified: Some(accountant_verified),
                    ..Default::default()
                },
            )
            .await?;
        info!(
            booking_id = %booking.id,
            accountant_verified,
            invoice_eligible = booking.is_invoice_eligible(),
            "Booking accountant verification set"
        );
        Ok(booking)
    }

    pub async fn set_cash_pending(&self, id: &str, cash_pending: bool) -> DomainResult<Booking> {
        let booking = self
            .repos
            .bookings()
            .patch(
                id,
                BookingPatch {
                    cash_pending: Some(cash_pending),
                    ..Default::default()
                },
            )
            .await?;
        info!(booking_id = %booking.id, cash_pending, "Booking cash pending set");

        self.reconciliation
            .reconcile_booking_parties(&booking)
            .await?;
        Ok(booking)
    }

    /// Pay out driver salary and allocate it over the driver's verified
    /// bookings with unpaid salary, oldest first. Transfers for one driver
    /// run one at a time.
    pub async fn transfer_salary(
        &self,
        driver_id: &str,
        transaction_id: &str,
        amount: Money,
    ) -> DomainResult<SalaryTransfer> {
        let driver = ActorRef::driver(driver_id);
        let _transfer = self.transfers.acquire(&driver).await;

        let open = self
            .repos
            .bookings()
            .find_with_unpaid_salary(driver_id)
            .await?;

        let unpaid: Money = open.iter().map(Booking::unpaid_salary).sum();
        if amount > unpaid {
            return Err(DomainError::Validation(format!(
                "transfer of {} exceeds the unpaid salary {}",
                amount, unpaid
            )));
        }

        let transaction = self
            .ledger
            .record_salary_transaction(&driver, transaction_id, amount)
            .await?;

        let (updated, lines) = allocate(open, amount);
        for (booking, line) in updated.iter().zip(&lines) {
            self.repos
                .bookings()
                .add_transfered_salary(&booking.id, line.transfered_salary)
                .await?;
        }

        self.append_transfer_trail(&driver, transaction_id, amount, lines.clone())
            .await?;

        let driver = self.reconciliation.reconcile(&driver, Money::ZERO).await?;
        info!(
            driver_id,
            transaction_id,
            amount = %amount,
            bookings = lines.len(),
            "Salary transferred"
        );

        Ok(SalaryTransfer {
            transaction,
            lines,
            driver,
        })
    }

    /// Ledger trail of a transfer. `added_advance` stays zero so the entry
    /// does not count as an advance.
    async fn append_transfer_trail(
        &self,
        driver: &ActorRef,
        transaction_id: &str,
        amount: Money,
        lines: Vec<CorrectionLine>,
    ) -> DomainResult<()> {
        let holder = self
            .repos
            .actors()
            .find(driver)
            .await?
            .ok_or_else(|| DomainError::not_found("Driver", driver.id.clone()))?;

        let entry = Advance {
            id: uuid::Uuid::new_v4().to_string(),
            actor: driver.clone(),
            added_advance: Money::ZERO,
            advance: amount,
            cash_in_hand: holder.snapshot.cash_in_hand,
            advance_type: AdvanceType::SalaryTransfer,
            remark: Some(format!("salary transfer {}", transaction_id)),
            lines,
            created_at: self.reconciliation.now(),
        };
        self.repos.ledger().append_advance(entry).await
    }
}

fn parties(b: &Booking) -> [Option<&str>; 3] {
    [
        b.driver_id.as_deref(),
        b.provider_id.as_deref(),
        b.company_id.as_deref(),
    ]
}

/// Spread `amount` over `bookings` in order, filling each booking's unpaid
/// salary before moving to the next. Returns the touched bookings and one
/// line per booking.
fn allocate(bookings: Vec<Booking>, amount: Money) -> (Vec<Booking>, Vec<CorrectionLine>) {
    let mut remaining = amount;
    let mut updated = Vec::new();
    let mut lines = Vec::new();

    for mut booking in bookings {
        if !remaining.is_positive() {
            break;
        }
        let share = booking.unpaid_salary().min(remaining);
        if !share.is_positive() {
            continue;
        }
        remaining -= share;
        booking.transfered_salary += share;
        booking.touch();

        lines.push(CorrectionLine {
            file_number: booking.file_number.clone(),
            driver_salary: booking.driver_salary,
            balance_salary: booking.unpaid_salary(),
            transfered_salary: share,
        });
        updated.push(booking);
    }

    (updated, lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::testing::{booking, register, Fixture};
    use crate::domain::actor::ActorKind;
    use crate::domain::booking::WorkType;

    async fn saved(fx: &Fixture, b: Booking) -> Booking {
        fx.repos.bookings().save(b.clone()).await.unwrap();
        b
    }

    #[tokio::test]
    async fn create_rejects_duplicate_file_number() {
        let fx = Fixture::new().await;
        let input = |driver: &str| {
            let b = booking("DUP-1", WorkType::RsaWork, driver);
            NewBooking {
                file_number: b.file_number,
                work_type: b.work_type,
                driver_id: b.driver_id,
                provider_id: None,
                showroom_id: None,
                company_id: None,
                created_by: None,
                total_amount: b.total_amount,
                driver_salary: b.driver_salary,
                payable_amount_for_driver: Money::ZERO,
                payable_amount_for_provider: Money::ZERO,
                insurance_amount: Money::ZERO,
                adjustment_value: Money::ZERO,
            }
        };
        fx.bookings.create(input("d1")).await.unwrap();
        let err = fx.bookings.create(input("d2")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn payment_work_lifecycle_reconciles_on_completion() {
        let fx = Fixture::strict().await;
        let driver = register(&fx, ActorKind::Driver).await;
        let mut b = booking("L-1", WorkType::PaymentWork, &driver.id);
        b.total_amount = Money::from_major(900);
        let b = saved(&fx, b).await;

        for event in [
            BookingEvent::CustomerCalled,
            BookingEvent::OrderReceived,
            BookingEvent::DriverAssigned,
            BookingEvent::PickupSubmitted,
            BookingEvent::PickupConfirmed,
            BookingEvent::DepartedForDropoff,
            BookingEvent::DropoffSubmitted,
        ] {
            fx.bookings.apply_event(&b.id, event).await.unwrap();
        }
        let dropped = fx.bookings.get(&b.id).await.unwrap();
        assert_eq!(dropped.status, BookingStatus::VehicleDropped);

        fx.bookings
            .apply_event(&b.id, BookingEvent::PaymentSettled)
            .await
            .unwrap();
        let cached = fx.repos.actors().find(&driver).await.unwrap().unwrap();
        assert_eq!(cached.snapshot.cash_in_hand, Money::from_major(900));
    }

    #[tokio::test]
    async fn strict_policy_rejects_skipping_payment_settlement() {
        let fx = Fixture::strict().await;
        let mut b = booking("L-2", WorkType::PaymentWork, "d1");
        b.status = BookingStatus::OnTheWayToDropoff;
        let b = saved(&fx, b).await;

        let err = fx
            .bookings
            .apply_event(&b.id, BookingEvent::PaymentSettled)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));
        let unchanged = fx.bookings.get(&b.id).await.unwrap();
        assert_eq!(unchanged.status, BookingStatus::OnTheWayToDropoff);
    }

    #[tokio::test]
    async fn permissive_policy_accepts_free_text_status() {
        let fx = Fixture::new().await;
        let b = saved(&fx, booking("L-3", WorkType::RsaWork, "d1")).await;

        let updated = fx
            .bookings
            .update(
                &b.id,
                BookingUpdate {
                    status: Some(BookingStatus::Custom("Waiting for crane".into())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(
            updated.status,
            BookingStatus::Custom("Waiting for crane".into())
        );
    }

    #[tokio::test]
    async fn settlement_cannot_exceed_total() {
        let fx = Fixture::new().await;
        let mut b = booking("P-1", WorkType::PaymentWork, "d1");
        b.total_amount = Money::from_major(500);
        let b = saved(&fx, b).await;

        let err = fx
            .bookings
            .settle(
                &b.id,
                Settlement {
                    received_amount: Money::from_major(501),
                    partial_amount: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let settled = fx
            .bookings
            .settle(
                &b.id,
                Settlement {
                    received_amount: Money::from_major(200),
                    partial_amount: Some(Money::from_major(200)),
                },
            )
            .await
            .unwrap();
        assert!(settled.partial_payment);
        assert_eq!(settled.outstanding(), Money::from_major(300));
    }

    #[tokio::test]
    async fn approval_requires_zero_outstanding() {
        let fx = Fixture::new().await;
        let mut b = booking("A-1", WorkType::PaymentWork, "d1");
        b.total_amount = Money::from_major(500);
        b.received_amount = Money::from_major(450);
        let b = saved(&fx, b).await;

        let err = fx.bookings.set_approve(&b.id, true).await.unwrap_err();
        assert!(matches!(err, DomainError::BusinessRule(_)));

        fx.bookings
            .settle(
                &b.id,
                Settlement {
                    received_amount: Money::from_major(500),
                    partial_amount: None,
                },
            )
            .await
            .unwrap();
        let approved = fx.bookings.set_approve(&b.id, true).await.unwrap();
        assert!(approved.approve);

        let verified = fx.bookings.set_accountant_verified(&b.id, true).await.unwrap();
        assert!(verified.is_invoice_eligible());
    }

    #[tokio::test]
    async fn verifying_refreshes_driver_salary() {
        let fx = Fixture::new().await;
        let driver = register(&fx, ActorKind::Driver).await;
        let mut b = booking("V-1", WorkType::RsaWork, &driver.id);
        b.driver_salary = Money::from_major(300);
        let b = saved(&fx, b).await;

        fx.bookings.set_verified(&b.id, true).await.unwrap();
        let cached = fx.repos.actors().find(&driver).await.unwrap().unwrap();
        assert_eq!(cached.snapshot.salary, Money::from_major(300));
    }

    #[tokio::test]
    async fn cash_pending_removes_booking_from_driver_cash() {
        let fx = Fixture::new().await;
        let driver = register(&fx, ActorKind::Driver).await;
        let mut b = booking("CP-1", WorkType::PaymentWork, &driver.id);
        b.total_amount = Money::from_major(400);
        b.status = BookingStatus::OrderCompleted;
        let b = saved(&fx, b).await;

        fx.bookings.set_cash_pending(&b.id, true).await.unwrap();
        let cached = fx.repos.actors().find(&driver).await.unwrap().unwrap();
        assert_eq!(cached.snapshot.cash_in_hand, Money::ZERO);

        fx.bookings.set_cash_pending(&b.id, false).await.unwrap();
        let cached = fx.repos.actors().find(&driver).await.unwrap().unwrap();
        assert_eq!(cached.snapshot.cash_in_hand, Money::from_major(400));
    }

    #[tokio::test]
    async fn salary_transfer_allocates_oldest_first() {
        let fx = Fixture::new().await;
        let driver = register(&fx, ActorKind::Driver).await;

        let base = chrono::Utc::now() - chrono::Duration::days(3);
        for (i, salary) in [300, 500].into_iter().enumerate() {
            let mut b = booking(&format!("T-{i}"), WorkType::RsaWork, &driver.id);
            b.driver_salary = Money::from_major(salary);
            b.verified = true;
            b.created_at = base + chrono::Duration::hours(i as i64);
            saved(&fx, b).await;
        }

        let transfer = fx
            .bookings
            .transfer_salary(&driver.id, "UTR-100", Money::from_major(450))
            .await
            .unwrap();

        assert_eq!(transfer.lines.len(), 2);
        assert_eq!(transfer.lines[0].file_number, "T-0");
        assert_eq!(transfer.lines[0].transfered_salary, Money::from_major(300));
        assert_eq!(transfer.lines[0].balance_salary, Money::ZERO);
        assert_eq!(transfer.lines[1].transfered_salary, Money::from_major(150));
        assert_eq!(transfer.lines[1].balance_salary, Money::from_major(350));
        assert_eq!(transfer.driver.snapshot.salary, Money::from_major(350));

        let trail = fx.ledger.advances_for(&driver).await.unwrap();
        assert_eq!(trail[0].advance_type, AdvanceType::SalaryTransfer);
        assert_eq!(trail[0].added_advance, Money::ZERO);
        assert_eq!(fx.ledger.monthly_advance(&driver.id).await.unwrap(), Money::ZERO);
    }

    #[tokio::test]
    async fn salary_transfer_above_unpaid_is_rejected_before_writing() {
        let fx = Fixture::new().await;
        let driver = register(&fx, ActorKind::Driver).await;
        let mut b = booking("T-9", WorkType::RsaWork, &driver.id);
        b.driver_salary = Money::from_major(100);
        b.verified = true;
        saved(&fx, b).await;

        let err = fx
            .bookings
            .transfer_salary(&driver.id, "UTR-1", Money::from_major(101))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(fx
            .repos
            .ledger()
            .find_salary_transaction(&driver, "UTR-1")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn concurrent_transfers_cannot_overpay_a_booking() {
        let fx = Fixture::new().await;
        let driver = register(&fx, ActorKind::Driver).await;
        let mut b = booking("T-20", WorkType::RsaWork, &driver.id);
        b.driver_salary = Money::from_major(600);
        b.verified = true;
        let b = saved(&fx, b).await;

        let (first, second) = tokio::join!(
            fx.bookings
                .transfer_salary(&driver.id, "UTR-A", Money::from_major(500)),
            fx.bookings
                .transfer_salary(&driver.id, "UTR-B", Money::from_major(500)),
        );
        let rejected: Vec<DomainError> = [first, second]
            .into_iter()
            .filter_map(Result::err)
            .collect();
        assert_eq!(rejected.len(), 1);
        assert!(matches!(rejected[0], DomainError::Validation(_)));

        let stored = fx.bookings.get(&b.id).await.unwrap();
        assert_eq!(stored.transfered_salary, Money::from_major(500));

        let ledger = fx.repos.ledger();
        let recorded = [
            ledger.find_salary_transaction(&driver, "UTR-A").await.unwrap(),
            ledger.find_salary_transaction(&driver, "UTR-B").await.unwrap(),
        ];
        assert_eq!(recorded.iter().flatten().count(), 1);

        let cached = fx.repos.actors().find(&driver).await.unwrap().unwrap();
        assert_eq!(cached.snapshot.salary, Money::from_major(100));
    }

    #[tokio::test]
    async fn concurrent_flag_and_settlement_writes_both_stick() {
        let fx = Fixture::new().await;
        let driver = register(&fx, ActorKind::Driver).await;

        for i in 0..6 {
            let mut b = booking(&format!("CW-{i}"), WorkType::PaymentWork, &driver.id);
            b.total_amount = Money::from_major(1000);
            b.driver_salary = Money::from_major(50);
            let b = saved(&fx, b).await;

            let settlement = Settlement {
                received_amount: Money::from_major(500),
                partial_amount: None,
            };
            let (verified, settled) = tokio::join!(
                fx.bookings.set_verified(&b.id, true),
                fx.bookings.settle(&b.id, settlement),
            );
            verified.unwrap();
            settled.unwrap();

            let stored = fx.bookings.get(&b.id).await.unwrap();
            assert!(stored.verified, "verification lost on {}", stored.file_number);
            assert_eq!(stored.received_amount, Money::from_major(500));
        }

        let cached = fx.repos.actors().find(&driver).await.unwrap().unwrap();
        assert_eq!(cached.snapshot.salary, Money::from_major(300));
    }

    #[test]
    fn allocate_stops_when_amount_is_spent() {
        let mut a = booking("X-1", WorkType::RsaWork, "d");
        a.driver_salary = Money::from_major(100);
        a.verified = true;
        let mut b = a.clone();
        b.file_number = "X-2".into();

        let (updated, lines) = allocate(vec![a, b], Money::from_major(60));
        assert_eq!(updated.len(), 1);
        assert_eq!(lines[0].balance_salary, Money::from_major(40));
    }
}
