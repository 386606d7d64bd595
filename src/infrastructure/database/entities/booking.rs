//! Booking entity

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub file_number: String,

    #[sea_orm(nullable)]
    pub driver_id: Option<String>,
    #[sea_orm(nullable)]
    pub provider_id: Option<String>,
    #[sea_orm(nullable)]
    pub showroom_id: Option<String>,
    #[sea_orm(nullable)]
    pub company_id: Option<String>,

    /// Showroom, ShowroomStaff, Admin or Staff
    #[sea_orm(nullable)]
    pub created_by_kind: Option<String>,
    #[sea_orm(nullable)]
    pub created_by_id: Option<String>,

    // Money columns hold minor currency units
    pub total_amount: i64,
    pub received_amount: i64,
    pub driver_salary: i64,
    pub transfered_salary: i64,
    pub payable_amount_for_driver: i64,
    pub payable_amount_for_provider: i64,
    pub insurance_amount: i64,
    pub adjustment_value: i64,
    pub partial_payment: bool,
    pub partial_amount: i64,

    /// Free-text status label, e.g. "Order Completed"
    pub status: String,
    /// RSAWork or PaymentWork
    pub work_type: String,

    #[sea_orm(nullable)]
    pub cash_pending: Option<bool>,
    pub approve: bool,
    pub verified: bool,
    pub accountant_verified: bool,
    pub cancel_status: bool,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
