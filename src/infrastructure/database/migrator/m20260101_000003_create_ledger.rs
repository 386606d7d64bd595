//! Create advances and salary_transactions tables

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Advances::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Advances::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Advances::ActorKind).string().not_null())
                    .col(ColumnDef::new(Advances::ActorId).string().not_null())
                    .col(
                        ColumnDef::new(Advances::AddedAdvance)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Advances::Advance)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Advances::CashInHand)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Advances::AdvanceType).string().not_null())
                    .col(ColumnDef::new(Advances::Remark).string())
                    .col(
                        ColumnDef::new(Advances::Lines)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(Advances::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_advances_actor")
                    .table(Advances::Table)
                    .col(Advances::ActorKind)
                    .col(Advances::ActorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SalaryTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SalaryTransactions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SalaryTransactions::ActorKind)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SalaryTransactions::ActorId).string().not_null())
                    .col(
                        ColumnDef::new(SalaryTransactions::TransactionId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SalaryTransactions::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SalaryTransactions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_salary_transactions_actor_ref")
                    .table(SalaryTransactions::Table)
                    .col(SalaryTransactions::ActorKind)
                    .col(SalaryTransactions::ActorId)
                    .col(SalaryTransactions::TransactionId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SalaryTransactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Advances::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Advances {
    Table,
    Id,
    ActorKind,
    ActorId,
    AddedAdvance,
    Advance,
    CashInHand,
    AdvanceType,
    Remark,
    Lines,
    CreatedAt,
}

#[derive(Iden)]
pub enum SalaryTransactions {
    Table,
    Id,
    ActorKind,
    ActorId,
    TransactionId,
    Amount,
    CreatedAt,
}
