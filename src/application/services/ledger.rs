//! Advance / salary ledger service
//!
//! Entries are appended and read, never edited. Appending does not
//! reconcile; callers decide when to refresh the snapshot.

use std::sync::Arc;

use tracing::info;

use super::reconciliation::ReconciliationService;
use crate::domain::actor::{Actor, ActorRef};
use crate::domain::ledger::{Advance, AdvanceType, CorrectionLine, SalaryTransaction};
use crate::domain::money::Money;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

/// Input for a new advance entry.
#[derive(Debug, Clone)]
pub struct NewAdvance {
    pub actor: ActorRef,
    pub amount: Money,
    pub advance_type: AdvanceType,
    pub remark: Option<String>,
    pub lines: Vec<CorrectionLine>,
}

pub struct LedgerService {
    repos: Arc<dyn RepositoryProvider>,
    reconciliation: Arc<ReconciliationService>,
}

impl LedgerService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        reconciliation: Arc<ReconciliationService>,
    ) -> Self {
        Self {
            repos,
            reconciliation,
        }
    }

    async fn ledger_holder(&self, actor: &ActorRef) -> DomainResult<Actor> {
        if !actor.kind.holds_ledger() {
            return Err(DomainError::Validation(format!(
                "{} actors do not hold ledger entries",
                actor.kind
            )));
        }
        self.repos
            .actors()
            .find(actor)
            .await?
            .ok_or_else(|| DomainError::not_found(actor.kind.as_str(), actor.id.clone()))
    }

    /// Append an advance entry. Does not reconcile.
    pub async fn create_advance(&self, input: NewAdvance) -> DomainResult<Advance> {
        if !input.amount.is_positive() {
            return Err(DomainError::Validation(
                "advance amount must be positive".into(),
            ));
        }
        let holder = self.ledger_holder(&input.actor).await?;

        let advance = Advance {
            id: uuid::Uuid::new_v4().to_string(),
            actor: input.actor,
            added_advance: input.amount,
            advance: input.amount,
            cash_in_hand: holder.snapshot.cash_in_hand,
            advance_type: input.advance_type,
            remark: input.remark,
            lines: input.lines,
            created_at: self.reconciliation.now(),
        };
        self.repos.ledger().append_advance(advance.clone()).await?;

        info!(
            actor = %advance.actor,
            amount = %advance.added_advance,
            advance_type = advance.advance_type.as_str(),
            "Advance recorded"
        );
        Ok(advance)
    }

    /// Append an advance and refresh the actor's snapshot with the amount
    /// added to cash in hand for this run.
    pub async fn create_advance_and_reconcile(
        &self,
        input: NewAdvance,
    ) -> DomainResult<(Advance, Actor)> {
        let advance = self.create_advance(input).await?;
        let actor = self
            .reconciliation
            .reconcile(&advance.actor, advance.added_advance)
            .await?;
        Ok((advance, actor))
    }

    /// Append a salary payout. The external `transaction_id` must be unique
    /// per actor.
    pub async fn record_salary_transaction(
        &self,
        actor: &ActorRef,
        transaction_id: &str,
        amount: Money,
    ) -> DomainResult<SalaryTransaction> {
        if !amount.is_positive() {
            return Err(DomainError::Validation(
                "salary amount must be positive".into(),
            ));
        }
        if transaction_id.trim().is_empty() {
            return Err(DomainError::Validation(
                "transaction id must not be empty".into(),
            ));
        }
        self.ledger_holder(actor).await?;

        if self
            .repos
            .ledger()
            .find_salary_transaction(actor, transaction_id)
            .await?
            .is_some()
        {
            return Err(DomainError::Conflict(format!(
                "salary transaction {} already recorded for {}",
                transaction_id, actor
            )));
        }

        let tx = SalaryTransaction {
            id: uuid::Uuid::new_v4().to_string(),
            actor: actor.clone(),
            transaction_id: transaction_id.to_string(),
            amount,
            created_at: self.reconciliation.now(),
        };
        self.repos.ledger().append_salary_transaction(tx.clone()).await?;

        info!(actor = %actor, transaction_id, amount = %amount, "Salary transaction recorded");
        Ok(tx)
    }

    /// Advances added to a driver in the current month.
    pub async fn monthly_advance(&self, driver_id: &str) -> DomainResult<Money> {
        self.reconciliation
            .engine()
            .monthly_advance(driver_id, self.reconciliation.current_window())
            .await
    }

    /// Newest first.
    pub async fn advances_for(&self, actor: &ActorRef) -> DomainResult<Vec<Advance>> {
        self.repos.ledger().advances_for(actor).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::testing::{register, Fixture};
    use crate::domain::actor::ActorKind;

    fn cash(actor: &ActorRef, amount: i64) -> NewAdvance {
        NewAdvance {
            actor: actor.clone(),
            amount: Money::from_major(amount),
            advance_type: AdvanceType::Advance,
            remark: None,
            lines: Vec::new(),
        }
    }

    #[tokio::test]
    async fn advance_feeds_monthly_sum_without_reconciling() {
        let fx = Fixture::new().await;
        let driver = register(&fx, ActorKind::Driver).await;

        fx.ledger.create_advance(cash(&driver, 120)).await.unwrap();
        fx.ledger.create_advance(cash(&driver, 30)).await.unwrap();

        assert_eq!(
            fx.ledger.monthly_advance(&driver.id).await.unwrap(),
            Money::from_major(150)
        );
        let cached = fx.repos.actors().find(&driver).await.unwrap().unwrap();
        assert!(cached.reconciled_at.is_none());
        assert_eq!(fx.ledger.advances_for(&driver).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn provider_advances_are_not_in_the_driver_monthly_sum() {
        let fx = Fixture::new().await;
        let provider = register(&fx, ActorKind::Provider).await;
        fx.ledger.create_advance(cash(&provider, 70)).await.unwrap();
        assert_eq!(
            fx.ledger.monthly_advance(&provider.id).await.unwrap(),
            Money::ZERO
        );
    }

    #[tokio::test]
    async fn create_and_reconcile_adds_amount_to_cash() {
        let fx = Fixture::new().await;
        let driver = register(&fx, ActorKind::Driver).await;
        let (_, actor) = fx
            .ledger
            .create_advance_and_reconcile(cash(&driver, 50))
            .await
            .unwrap();
        assert_eq!(actor.snapshot.cash_in_hand, Money::from_major(50));
        assert_eq!(actor.snapshot.monthly.advance, Money::from_major(50));
    }

    #[tokio::test]
    async fn rejects_companies_and_non_positive_amounts() {
        let fx = Fixture::new().await;
        let company = register(&fx, ActorKind::Company).await;
        let driver = register(&fx, ActorKind::Driver).await;

        let err = fx.ledger.create_advance(cash(&company, 10)).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        let err = fx.ledger.create_advance(cash(&driver, 0)).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn duplicate_salary_transaction_conflicts() {
        let fx = Fixture::new().await;
        let driver = register(&fx, ActorKind::Driver).await;
        let amount = Money::from_major(200);

        fx.ledger
            .record_salary_transaction(&driver, "UTR-9", amount)
            .await
            .unwrap();
        let err = fx
            .ledger
            .record_salary_transaction(&driver, "UTR-9", amount)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }
}
