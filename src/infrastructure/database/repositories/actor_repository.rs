//! SeaORM implementation of ActorRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set,
};

use crate::domain::actor::{
    Actor, ActorKind, ActorRef, ActorRepository, FinancialSnapshot, MonthlyFigures,
};
use crate::domain::money::Money;
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::actor;

pub struct SeaOrmActorRepository {
    db: DatabaseConnection,
}

impl SeaOrmActorRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_model(&self, r: &ActorRef) -> DomainResult<Option<actor::Model>> {
        Ok(actor::Entity::find_by_id(r.id.clone())
            .filter(actor::Column::Kind.eq(r.kind.as_str()))
            .one(&self.db)
            .await?)
    }
}

fn model_to_domain(a: actor::Model) -> DomainResult<Actor> {
    let kind = ActorKind::from_str(&a.kind).ok_or_else(|| {
        DomainError::Database(format!("actor {} has unknown kind '{}'", a.id, a.kind))
    })?;

    Ok(Actor {
        id: a.id,
        kind,
        name: a.name,
        phone: a.phone,
        snapshot: FinancialSnapshot {
            cash_in_hand: Money::from_minor(a.cash_in_hand),
            salary: Money::from_minor(a.driver_salary),
            balance: Money::from_minor(a.balance_amount),
            monthly: MonthlyFigures {
                diesel_expense: Money::from_minor(a.diesel_expense),
                expense: Money::from_minor(a.expense),
                total_expense: Money::from_minor(a.total_expense),
                salary: Money::from_minor(a.total_salary),
                advance: Money::from_minor(a.total_advance),
            },
        },
        reconciled_at: a.reconciled_at,
        created_at: a.created_at,
    })
}

#[async_trait]
impl ActorRepository for SeaOrmActorRepository {
    async fn save(&self, a: Actor) -> DomainResult<()> {
        debug!("Saving {} actor: {} ({})", a.kind, a.name, a.id);
        let s = a.snapshot;
        let model = actor::ActiveModel {
            id: Set(a.id),
            kind: Set(a.kind.as_str().to_string()),
            name: Set(a.name),
            phone: Set(a.phone),
            cash_in_hand: Set(s.cash_in_hand.minor()),
            driver_salary: Set(s.salary.minor()),
            balance_amount: Set(s.balance.minor()),
            diesel_expense: Set(s.monthly.diesel_expense.minor()),
            expense: Set(s.monthly.expense.minor()),
            total_expense: Set(s.monthly.total_expense.minor()),
            total_salary: Set(s.monthly.salary.minor()),
            total_advance: Set(s.monthly.advance.minor()),
            reconciled_at: Set(a.reconciled_at),
            created_at: Set(a.created_at),
        };
        model.insert(&self.db).await?;
        Ok(())
    }

    async fn find(&self, r: &ActorRef) -> DomainResult<Option<Actor>> {
        self.find_model(r).await?.map(model_to_domain).transpose()
    }

    async fn store_snapshot(
        &self,
        r: &ActorRef,
        s: &FinancialSnapshot,
        reconciled_at: DateTime<Utc>,
    ) -> DomainResult<Actor> {
        let Some(existing) = self.find_model(r).await? else {
            return Err(DomainError::not_found(r.kind.as_str(), r.id.clone()));
        };

        debug!("Storing snapshot for {}", r);
        let mut model = existing.into_active_model();
        model.cash_in_hand = Set(s.cash_in_hand.minor());
        model.driver_salary = Set(s.salary.minor());
        model.balance_amount = Set(s.balance.minor());
        model.diesel_expense = Set(s.monthly.diesel_expense.minor());
        model.expense = Set(s.monthly.expense.minor());
        model.total_expense = Set(s.monthly.total_expense.minor());
        model.total_salary = Set(s.monthly.salary.minor());
        model.total_advance = Set(s.monthly.advance.minor());
        model.reconciled_at = Set(Some(reconciled_at));

        let updated = model.update(&self.db).await?;
        model_to_domain(updated)
    }
}
