//! Financial reconciliation
//!
//! Recomputes an actor's snapshot from the source records and overwrites the
//! cached copy on the actor row. Nothing else writes the snapshot.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::aggregation::AggregationEngine;
use crate::application::locks::ActorLocks;
use crate::domain::actor::{Actor, ActorKind, ActorRef, FinancialSnapshot, MonthlyFigures};
use crate::domain::booking::Booking;
use crate::domain::money::Money;
use crate::domain::period::MonthWindow;
use crate::domain::{DomainResult, RepositoryProvider};

/// Source of "now" for the monthly window.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

pub struct ReconciliationService {
    repos: Arc<dyn RepositoryProvider>,
    engine: AggregationEngine,
    locks: ActorLocks,
    clock: Clock,
}

impl ReconciliationService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self {
            engine: AggregationEngine::new(repos.clone()),
            repos,
            locks: ActorLocks::new(),
            clock: Arc::new(Utc::now),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn engine(&self) -> &AggregationEngine {
        &self.engine
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    pub fn current_window(&self) -> MonthWindow {
        MonthWindow::containing(self.now())
    }

    /// Recompute and store the snapshot of any actor.
    ///
    /// `advance` is a one-off amount added to cash in hand for this run only;
    /// it is not read back from the ledger. Companies ignore it.
    pub async fn reconcile(&self, actor: &ActorRef, advance: Money) -> DomainResult<Actor> {
        let _guard = self.locks.acquire(actor).await;
        let started = Instant::now();

        let snapshot = self.compute(actor, advance).await?;
        let updated = self
            .repos
            .actors()
            .store_snapshot(actor, &snapshot, self.now())
            .await?;

        let kind = actor.kind.as_str();
        metrics::counter!("reconciliations_total", "kind" => kind).increment(1);
        metrics::histogram!("reconciliation_duration_seconds", "kind" => kind)
            .record(started.elapsed().as_secs_f64());

        info!(
            actor = %actor,
            cash_in_hand = %snapshot.cash_in_hand,
            salary = %snapshot.salary,
            balance = %snapshot.balance,
            "Actor reconciled"
        );

        Ok(updated)
    }

    pub async fn reconcile_driver(&self, driver_id: &str, advance: Money) -> DomainResult<Actor> {
        self.reconcile(&ActorRef::driver(driver_id), advance).await
    }

    pub async fn reconcile_provider(
        &self,
        provider_id: &str,
        advance: Money,
    ) -> DomainResult<Actor> {
        self.reconcile(&ActorRef::provider(provider_id), advance)
            .await
    }

    pub async fn reconcile_company(&self, company_id: &str) -> DomainResult<Actor> {
        self.reconcile(&ActorRef::company(company_id), Money::ZERO)
            .await
    }

    /// Reconcile every registered party of a booking. Parties that are not
    /// registered as actors are skipped.
    pub async fn reconcile_booking_parties(&self, booking: &Booking) -> DomainResult<()> {
        let parties = [
            booking.driver_id.as_deref().map(ActorRef::driver),
            booking.provider_id.as_deref().map(ActorRef::provider),
            booking.company_id.as_deref().map(ActorRef::company),
        ];

        for actor in parties.into_iter().flatten() {
            if self.repos.actors().find(&actor).await?.is_none() {
                debug!(actor = %actor, booking = %booking.id, "Party not registered, skipping");
                continue;
            }
            self.reconcile(&actor, Money::ZERO).await?;
        }
        Ok(())
    }

    async fn compute(&self, actor: &ActorRef, advance: Money) -> DomainResult<FinancialSnapshot> {
        let net_total = self.engine.net_total_amount_in_hand(actor).await?;

        Ok(match actor.kind {
            ActorKind::Driver => {
                let salary = self.engine.total_salary(actor).await?;
                let monthly: MonthlyFigures = self
                    .engine
                    .monthly_figures(&actor.id, self.current_window())
                    .await?;
                FinancialSnapshot::for_driver(net_total, salary, advance, monthly)
            }
            ActorKind::Provider => {
                let salary = self.engine.total_salary(actor).await?;
                FinancialSnapshot::for_provider(net_total, salary, advance)
            }
            ActorKind::Company => FinancialSnapshot::for_company(net_total),
        })
    }
}
