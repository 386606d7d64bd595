//! SeaORM implementation of ExpenseRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Set};

use crate::domain::expense::{DieselExpense, DieselStatus, Expense, ExpenseRepository};
use crate::domain::money::Money;
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{diesel_expense, expense};

pub struct SeaOrmExpenseRepository {
    db: DatabaseConnection,
}

impl SeaOrmExpenseRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn expense_to_domain(e: expense::Model) -> Expense {
    Expense {
        id: e.id,
        driver_id: e.driver_id,
        amount: Money::from_minor(e.amount),
        description: e.description,
        approve: e.approve,
        created_at: e.created_at,
    }
}

fn diesel_to_domain(d: diesel_expense::Model) -> DieselExpense {
    DieselExpense {
        status: DieselStatus::from_str(&d.status).unwrap_or(DieselStatus::Pending),
        id: d.id,
        driver_id: d.driver_id,
        amount: Money::from_minor(d.amount),
        created_at: d.created_at,
    }
}

#[async_trait]
impl ExpenseRepository for SeaOrmExpenseRepository {
    async fn save_expense(&self, e: Expense) -> DomainResult<()> {
        debug!("Saving expense {} for driver {}", e.id, e.driver_id);
        let model = expense::ActiveModel {
            id: Set(e.id),
            driver_id: Set(e.driver_id),
            amount: Set(e.amount.minor()),
            description: Set(e.description),
            approve: Set(e.approve),
            created_at: Set(e.created_at),
        };
        model.insert(&self.db).await?;
        Ok(())
    }

    async fn set_expense_approval(&self, id: &str, approve: bool) -> DomainResult<Expense> {
        let Some(existing) = expense::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
        else {
            return Err(DomainError::not_found("Expense", id));
        };

        let mut model = existing.into_active_model();
        model.approve = Set(approve);
        Ok(expense_to_domain(model.update(&self.db).await?))
    }

    async fn save_diesel(&self, d: DieselExpense) -> DomainResult<()> {
        debug!("Saving diesel expense {} for driver {}", d.id, d.driver_id);
        let model = diesel_expense::ActiveModel {
            id: Set(d.id),
            driver_id: Set(d.driver_id),
            amount: Set(d.amount.minor()),
            status: Set(d.status.as_str().to_string()),
            created_at: Set(d.created_at),
        };
        model.insert(&self.db).await?;
        Ok(())
    }

    async fn set_diesel_status(
        &self,
        id: &str,
        status: DieselStatus,
    ) -> DomainResult<DieselExpense> {
        let Some(existing) = diesel_expense::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
        else {
            return Err(DomainError::not_found("DieselExpense", id));
        };

        let mut model = existing.into_active_model();
        model.status = Set(status.as_str().to_string());
        Ok(diesel_to_domain(model.update(&self.db).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::testing::memory_db;

    #[tokio::test]
    async fn approval_flags_are_persisted() {
        let repo = SeaOrmExpenseRepository::new(memory_db().await);

        let e = Expense::new("d1", Money::from_major(80), Some("toll".into()));
        let id = e.id.clone();
        repo.save_expense(e).await.unwrap();
        assert!(repo.set_expense_approval(&id, true).await.unwrap().approve);

        let d = DieselExpense::new("d1", Money::from_major(1500));
        let id = d.id.clone();
        repo.save_diesel(d).await.unwrap();
        let updated = repo
            .set_diesel_status(&id, DieselStatus::Approved)
            .await
            .unwrap();
        assert_eq!(updated.status, DieselStatus::Approved);
    }

    #[tokio::test]
    async fn approving_unknown_expense_is_not_found() {
        let repo = SeaOrmExpenseRepository::new(memory_db().await);
        let err = repo.set_expense_approval("nope", true).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
