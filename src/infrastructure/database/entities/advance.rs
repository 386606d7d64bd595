//! Advance ledger entity (append-only)

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "advances")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub actor_kind: String,
    pub actor_id: String,

    pub added_advance: i64,
    pub advance: i64,
    pub cash_in_hand: i64,
    pub advance_type: String,

    #[sea_orm(nullable)]
    pub remark: Option<String>,

    /// Per-booking correction lines as a JSON array
    #[sea_orm(column_type = "Text")]
    pub lines: String,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
