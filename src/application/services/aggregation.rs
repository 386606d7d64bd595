//! Aggregation engine
//!
//! Combines the raw sums of the aggregation port into the figures the
//! reconciliation works with. Read only.

use std::sync::Arc;

use crate::domain::actor::{ActorKind, ActorRef, MonthlyFigures};
use crate::domain::aggregation::CashScope;
use crate::domain::money::Money;
use crate::domain::period::MonthWindow;
use crate::domain::{DomainResult, RepositoryProvider};

#[derive(Clone)]
pub struct AggregationEngine {
    repos: Arc<dyn RepositoryProvider>,
}

impl AggregationEngine {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Outstanding amounts on completed bookings plus partial payments.
    pub async fn net_total_amount_in_hand(&self, actor: &ActorRef) -> DomainResult<Money> {
        let agg = self.repos.aggregations();
        let completed = agg
            .completed_outstanding(&CashScope::for_actor(actor))
            .await?;
        let partial = agg.partial_payments(actor).await?;
        Ok(completed + partial)
    }

    /// Salary owed over verified bookings.
    ///
    /// Drivers are credited for what was already transferred, providers are
    /// not. Companies carry no salary.
    pub async fn total_salary(&self, actor: &ActorRef) -> DomainResult<Money> {
        if actor.kind == ActorKind::Company {
            return Ok(Money::ZERO);
        }
        let totals = self.repos.aggregations().verified_salary(actor, None).await?;
        Ok(match actor.kind {
            ActorKind::Driver => totals.driver_salary - totals.transfered_salary,
            _ => totals.driver_salary,
        })
    }

    pub async fn monthly_salary(&self, driver_id: &str, window: MonthWindow) -> DomainResult<Money> {
        let totals = self
            .repos
            .aggregations()
            .verified_salary(&ActorRef::driver(driver_id), Some(window))
            .await?;
        Ok(totals.driver_salary)
    }

    pub async fn monthly_expense(&self, driver_id: &str, window: MonthWindow) -> DomainResult<Money> {
        self.repos
            .aggregations()
            .approved_expenses(driver_id, Some(window))
            .await
    }

    pub async fn total_expense(&self, driver_id: &str) -> DomainResult<Money> {
        self.repos
            .aggregations()
            .approved_expenses(driver_id, None)
            .await
    }

    pub async fn monthly_diesel_expense(
        &self,
        driver_id: &str,
        window: MonthWindow,
    ) -> DomainResult<Money> {
        self.repos
            .aggregations()
            .approved_diesel(driver_id, window)
            .await
    }

    /// Advances added to a driver inside `window`.
    pub async fn monthly_advance(&self, driver_id: &str, window: MonthWindow) -> DomainResult<Money> {
        self.repos
            .aggregations()
            .added_advances(&ActorRef::driver(driver_id), window)
            .await
    }

    /// All month-scoped display figures of a driver.
    pub async fn monthly_figures(
        &self,
        driver_id: &str,
        window: MonthWindow,
    ) -> DomainResult<MonthlyFigures> {
        Ok(MonthlyFigures {
            diesel_expense: self.monthly_diesel_expense(driver_id, window).await?,
            expense: self.monthly_expense(driver_id, window).await?,
            total_expense: self.total_expense(driver_id).await?,
            salary: self.monthly_salary(driver_id, window).await?,
            advance: self.monthly_advance(driver_id, window).await?,
        })
    }
}
