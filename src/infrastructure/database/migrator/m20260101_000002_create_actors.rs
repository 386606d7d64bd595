//! Create actors table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(Actors::Table)
            .if_not_exists()
            .col(ColumnDef::new(Actors::Id).string().not_null().primary_key())
            .col(ColumnDef::new(Actors::Kind).string().not_null())
            .col(ColumnDef::new(Actors::Name).string().not_null())
            .col(ColumnDef::new(Actors::Phone).string());

        for col in [
            Actors::CashInHand,
            Actors::DriverSalary,
            Actors::BalanceAmount,
            Actors::DieselExpense,
            Actors::Expense,
            Actors::TotalExpense,
            Actors::TotalSalary,
            Actors::TotalAdvance,
        ] {
            table.col(ColumnDef::new(col).big_integer().not_null().default(0));
        }

        table
            .col(ColumnDef::new(Actors::ReconciledAt).timestamp_with_time_zone())
            .col(
                ColumnDef::new(Actors::CreatedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            );

        manager.create_table(table.to_owned()).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_actors_kind")
                    .table(Actors::Table)
                    .col(Actors::Kind)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Actors::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Actors {
    Table,
    Id,
    Kind,
    Name,
    Phone,
    CashInHand,
    DriverSalary,
    BalanceAmount,
    DieselExpense,
    Expense,
    TotalExpense,
    TotalSalary,
    TotalAdvance,
    ReconciledAt,
    CreatedAt,
}
