//! Read port for the sums the reconciliation is built from.
//!
//! Implementations run one `SUM` per call and return [`Money::ZERO`] when no
//! rows match. Which bookings count for which kind of actor is decided here,
//! not in the storage layer.

use async_trait::async_trait;

use crate::domain::actor::{ActorKind, ActorRef};
use crate::domain::money::Money;
use crate::domain::period::MonthWindow;
use crate::domain::DomainResult;

/// Filter for the completed-booking cash pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CashScope {
    pub actor: ActorRef,
    /// Only `PaymentWork` bookings count.
    pub payment_work_only: bool,
    /// Skip bookings whose `cash_pending` is `true` (`NULL` still counts).
    pub exclude_cash_pending: bool,
}

impl CashScope {
    /// Drivers: PaymentWork, cash-pending excluded. Providers: PaymentWork,
    /// cash-pending *not* excluded. Companies: every work type.
    pub fn for_actor(actor: &ActorRef) -> Self {
        let (payment_work_only, exclude_cash_pending) = match actor.kind {
            ActorKind::Driver => (true, true),
            ActorKind::Provider => (true, false),
            ActorKind::Company => (false, false),
        };
        Self {
            actor: actor.clone(),
            payment_work_only,
            exclude_cash_pending,
        }
    }
}

/// Salary sums over verified bookings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SalaryTotals {
    pub driver_salary: Money,
    pub transfered_salary: Money,
}

#[async_trait]
pub trait AggregationRepository: Send + Sync {
    /// `SUM(total_amount - received_amount)` over `Order Completed` bookings in scope.
    async fn completed_outstanding(&self, scope: &CashScope) -> DomainResult<Money>;

    /// `SUM(partial_amount)` over the actor's PaymentWork bookings flagged
    /// `partial_payment`.
    async fn partial_payments(&self, actor: &ActorRef) -> DomainResult<Money>;

    /// Salary sums over the actor's verified bookings, optionally limited to
    /// bookings created inside `window`.
    async fn verified_salary(
        &self,
        actor: &ActorRef,
        window: Option<MonthWindow>,
    ) -> DomainResult<SalaryTotals>;

    /// `SUM(amount)` over the driver's approved expenses.
    async fn approved_expenses(
        &self,
        driver_id: &str,
        window: Option<MonthWindow>,
    ) -> DomainResult<Money>;

    /// `SUM(amount)` over the driver's `Approved` diesel expenses in `window`.
    async fn approved_diesel(&self, driver_id: &str, window: MonthWindow) -> DomainResult<Money>;

    /// `SUM(added_advance)` over ledger advances of `actor` in `window`.
    async fn added_advances(&self, actor: &ActorRef, window: MonthWindow) -> DomainResult<Money>;
}
