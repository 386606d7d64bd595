//! Actor entity: drivers, providers and companies with their cached snapshot

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "actors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Driver, Provider or Company
    pub kind: String,
    pub name: String,

    #[sea_orm(nullable)]
    pub phone: Option<String>,

    pub cash_in_hand: i64,
    pub driver_salary: i64,
    pub balance_amount: i64,
    pub diesel_expense: i64,
    pub expense: i64,
    pub total_expense: i64,
    /// Verified salary of the current month
    pub total_salary: i64,
    /// Advances added in the current month
    pub total_advance: i64,

    #[sea_orm(nullable)]
    pub reconciled_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
