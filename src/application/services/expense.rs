//! Expense intake and approval

use std::sync::Arc;

use tracing::info;

use super::reconciliation::ReconciliationService;
use crate::domain::actor::ActorRef;
use crate::domain::expense::{DieselExpense, DieselStatus, Expense};
use crate::domain::money::Money;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

pub struct ExpenseService {
    repos: Arc<dyn RepositoryProvider>,
    reconciliation: Arc<ReconciliationService>,
}

impl ExpenseService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        reconciliation: Arc<ReconciliationService>,
    ) -> Self {
        Self {
            repos,
            reconciliation,
        }
    }

    async fn ensure_driver(&self, driver_id: &str) -> DomainResult<()> {
        let driver = ActorRef::driver(driver_id);
        match self.repos.actors().find(&driver).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::not_found("Driver", driver_id)),
        }
    }

    fn ensure_positive(amount: Money) -> DomainResult<()> {
        if amount.is_positive() {
            Ok(())
        } else {
            Err(DomainError::Validation(
                "expense amount must be positive".into(),
            ))
        }
    }

    pub async fn record_expense(
        &self,
        driver_id: &str,
        amount: Money,
        description: Option<String>,
    ) -> DomainResult<Expense> {
        Self::ensure_positive(amount)?;
        self.ensure_driver(driver_id).await?;

        let mut expense = Expense::new(driver_id, amount, description);
        expense.created_at = self.reconciliation.now();
        self.repos.expenses().save_expense(expense.clone()).await?;
        info!(driver_id, expense_id = %expense.id, amount = %amount, "Expense recorded");
        Ok(expense)
    }

    /// Approval changes what the driver's figures include, so the driver is
    /// reconciled afterwards.
    pub async fn set_expense_approval(&self, id: &str, approve: bool) -> DomainResult<Expense> {
        let expense = self.repos.expenses().set_expense_approval(id, approve).await?;
        info!(expense_id = id, approve, "Expense approval set");
        self.reconciliation
            .reconcile_driver(&expense.driver_id, Money::ZERO)
            .await?;
        Ok(expense)
    }

    pub async fn record_diesel(&self, driver_id: &str, amount: Money) -> DomainResult<DieselExpense> {
        Self::ensure_positive(amount)?;
        self.ensure_driver(driver_id).await?;

        let mut diesel = DieselExpense::new(driver_id, amount);
        diesel.created_at = self.reconciliation.now();
        self.repos.expenses().save_diesel(diesel.clone()).await?;
        info!(driver_id, diesel_id = %diesel.id, amount = %amount, "Diesel expense recorded");
        Ok(diesel)
    }

    pub async fn set_diesel_status(
        &self,
        id: &str,
        status: DieselStatus,
    ) -> DomainResult<DieselExpense> {
        let diesel = self.repos.expenses().set_diesel_status(id, status).await?;
        info!(diesel_id = id, status = status.as_str(), "Diesel expense status set");
        self.reconciliation
            .reconcile_driver(&diesel.driver_id, Money::ZERO)
            .await?;
        Ok(diesel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::testing::{register, Fixture};
    use crate::domain::actor::ActorKind;

    #[tokio::test]
    async fn approvals_show_up_in_driver_figures() {
        let fx = Fixture::new().await;
        let driver = register(&fx, ActorKind::Driver).await;

        let e = fx
            .expenses
            .record_expense(&driver.id, Money::from_major(75), Some("tyre".into()))
            .await
            .unwrap();
        let d = fx
            .expenses
            .record_diesel(&driver.id, Money::from_major(2000))
            .await
            .unwrap();

        fx.expenses.set_expense_approval(&e.id, true).await.unwrap();
        fx.expenses
            .set_diesel_status(&d.id, DieselStatus::Approved)
            .await
            .unwrap();

        let cached = fx.repos.actors().find(&driver).await.unwrap().unwrap();
        assert_eq!(cached.snapshot.monthly.expense, Money::from_major(75));
        assert_eq!(cached.snapshot.monthly.total_expense, Money::from_major(75));
        assert_eq!(
            cached.snapshot.monthly.diesel_expense,
            Money::from_major(2000)
        );

        fx.expenses
            .set_diesel_status(&d.id, DieselStatus::Rejected)
            .await
            .unwrap();
        let cached = fx.repos.actors().find(&driver).await.unwrap().unwrap();
        assert_eq!(cached.snapshot.monthly.diesel_expense, Money::ZERO);
    }

    #[tokio::test]
    async fn expense_for_unknown_driver_is_not_found() {
        let fx = Fixture::new().await;
        let err = fx
            .expenses
            .record_expense("ghost", Money::from_major(10), None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
