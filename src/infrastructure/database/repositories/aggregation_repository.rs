//! SeaORM implementation of AggregationRepository
//!
//! Every query is a single `SUM(...)` projection. SQL returns `NULL` for a
//! sum over no rows; that is mapped to zero here.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect, Select,
};

use crate::domain::actor::{ActorKind, ActorRef};
use crate::domain::aggregation::{AggregationRepository, CashScope, SalaryTotals};
use crate::domain::booking::{BookingStatus, WorkType};
use crate::domain::expense::DieselStatus;
use crate::domain::money::Money;
use crate::domain::period::MonthWindow;
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::{advance, booking, diesel_expense, expense};

pub struct SeaOrmAggregationRepository {
    db: DatabaseConnection,
}

impl SeaOrmAggregationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn sum<E: EntityTrait>(&self, select: Select<E>, expr: SimpleExpr) -> DomainResult<Money> {
        let total: Option<Option<i64>> = select
            .select_only()
            .column_as(SimpleExpr::from(Func::sum(expr)), "total")
            .into_tuple()
            .one(&self.db)
            .await?;
        Ok(Money::from_minor(total.flatten().unwrap_or(0)))
    }
}

fn booking_party_column(kind: ActorKind) -> booking::Column {
    match kind {
        ActorKind::Driver => booking::Column::DriverId,
        ActorKind::Provider => booking::Column::ProviderId,
        ActorKind::Company => booking::Column::CompanyId,
    }
}

fn bookings_of(actor: &ActorRef) -> Select<booking::Entity> {
    booking::Entity::find().filter(booking_party_column(actor.kind).eq(actor.id.as_str()))
}

fn within<C: ColumnTrait>(column: C, window: MonthWindow) -> Condition {
    Condition::all()
        .add(column.gte(window.start))
        .add(column.lt(window.end))
}

#[async_trait]
impl AggregationRepository for SeaOrmAggregationRepository {
    async fn completed_outstanding(&self, scope: &CashScope) -> DomainResult<Money> {
        let mut query = bookings_of(&scope.actor)
            .filter(booking::Column::Status.eq(BookingStatus::OrderCompleted.as_str()));
        if scope.payment_work_only {
            query = query.filter(booking::Column::WorkType.eq(WorkType::PaymentWork.as_str()));
        }
        if scope.exclude_cash_pending {
            query = query.filter(
                Condition::any()
                    .add(booking::Column::CashPending.eq(false))
                    .add(booking::Column::CashPending.is_null()),
            );
        }

        let outstanding = Expr::col(booking::Column::TotalAmount)
            .sub(Expr::col(booking::Column::ReceivedAmount));
        self.sum(query, outstanding).await
    }

    async fn partial_payments(&self, actor: &ActorRef) -> DomainResult<Money> {
        let query = bookings_of(actor)
            .filter(booking::Column::PartialPayment.eq(true))
            .filter(booking::Column::WorkType.eq(WorkType::PaymentWork.as_str()));
        self.sum(query, Expr::col(booking::Column::PartialAmount).into())
            .await
    }

    async fn verified_salary(
        &self,
        actor: &ActorRef,
        window: Option<MonthWindow>,
    ) -> DomainResult<SalaryTotals> {
        let mut query = bookings_of(actor).filter(booking::Column::Verified.eq(true));
        if let Some(window) = window {
            query = query.filter(within(booking::Column::CreatedAt, window));
        }

        let row: Option<(Option<i64>, Option<i64>)> = query
            .select_only()
            .column_as(
                SimpleExpr::from(Func::sum(Expr::col(booking::Column::DriverSalary))),
                "driver_salary",
            )
            .column_as(
                SimpleExpr::from(Func::sum(Expr::col(booking::Column::TransferedSalary))),
                "transfered_salary",
            )
            .into_tuple()
            .one(&self.db)
            .await?;

        let (salary, transfered) = row.unwrap_or((None, None));
        Ok(SalaryTotals {
            driver_salary: Money::from_minor(salary.unwrap_or(0)),
            transfered_salary: Money::from_minor(transfered.unwrap_or(0)),
        })
    }

    async fn approved_expenses(
        &self,
        driver_id: &str,
        window: Option<MonthWindow>,
    ) -> DomainResult<Money> {
        let mut query = expense::Entity::find()
            .filter(expense::Column::DriverId.eq(driver_id))
            .filter(expense::Column::Approve.eq(true));
        if let Some(window) = window {
            query = query.filter(within(expense::Column::CreatedAt, window));
        }
        self.sum(query, Expr::col(expense::Column::Amount).into())
            .await
    }

    async fn approved_diesel(&self, driver_id: &str, window: MonthWindow) -> DomainResult<Money> {
        let query = diesel_expense::Entity::find()
            .filter(diesel_expense::Column::DriverId.eq(driver_id))
            .filter(diesel_expense::Column::Status.eq(DieselStatus::Approved.as_str()))
            .filter(within(diesel_expense::Column::CreatedAt, window));
        self.sum(query, Expr::col(diesel_expense::Column::Amount).into())
            .await
    }

    async fn added_advances(&self, actor: &ActorRef, window: MonthWindow) -> DomainResult<Money> {
        let query = advance::Entity::find()
            .filter(advance::Column::ActorKind.eq(actor.kind.as_str()))
            .filter(advance::Column::ActorId.eq(actor.id.as_str()))
            .filter(within(advance::Column::CreatedAt, window));
        self.sum(query, Expr::col(advance::Column::AddedAdvance).into())
            .await
    }
}
