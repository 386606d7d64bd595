//! Create bookings table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bookings::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bookings::FileNumber).string().not_null())
                    .col(ColumnDef::new(Bookings::DriverId).string())
                    .col(ColumnDef::new(Bookings::ProviderId).string())
                    .col(ColumnDef::new(Bookings::ShowroomId).string())
                    .col(ColumnDef::new(Bookings::CompanyId).string())
                    .col(ColumnDef::new(Bookings::CreatedByKind).string())
                    .col(ColumnDef::new(Bookings::CreatedById).string())
                    .col(money(Bookings::TotalAmount))
                    .col(money(Bookings::ReceivedAmount))
                    .col(money(Bookings::DriverSalary))
                    .col(money(Bookings::TransferedSalary))
                    .col(money(Bookings::PayableAmountForDriver))
                    .col(money(Bookings::PayableAmountForProvider))
                    .col(money(Bookings::InsuranceAmount))
                    .col(money(Bookings::AdjustmentValue))
                    .col(
                        ColumnDef::new(Bookings::PartialPayment)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(money(Bookings::PartialAmount))
                    .col(
                        ColumnDef::new(Bookings::Status)
                            .string()
                            .not_null()
                            .default("Booking Added"),
                    )
                    .col(ColumnDef::new(Bookings::WorkType).string().not_null())
                    .col(ColumnDef::new(Bookings::CashPending).boolean())
                    .col(flag(Bookings::Approve))
                    .col(flag(Bookings::Verified))
                    .col(flag(Bookings::AccountantVerified))
                    .col(flag(Bookings::CancelStatus))
                    .col(
                        ColumnDef::new(Bookings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_file_number")
                    .table(Bookings::Table)
                    .col(Bookings::FileNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        for (name, col) in [
            ("idx_bookings_driver_id", Bookings::DriverId),
            ("idx_bookings_provider_id", Bookings::ProviderId),
            ("idx_bookings_company_id", Bookings::CompanyId),
            ("idx_bookings_status", Bookings::Status),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Bookings::Table)
                        .col(col)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await
    }
}

fn money(col: Bookings) -> ColumnDef {
    ColumnDef::new(col)
        .big_integer()
        .not_null()
        .default(0)
        .to_owned()
}

fn flag(col: Bookings) -> ColumnDef {
    ColumnDef::new(col)
        .boolean()
        .not_null()
        .default(false)
        .to_owned()
}

#[derive(Iden)]
pub enum Bookings {
    Table,
    Id,
    FileNumber,
    DriverId,
    ProviderId,
    ShowroomId,
    CompanyId,
    CreatedByKind,
    CreatedById,
    TotalAmount,
    ReceivedAmount,
    DriverSalary,
    TransferedSalary,
    PayableAmountForDriver,
    PayableAmountForProvider,
    InsuranceAmount,
    AdjustmentValue,
    PartialPayment,
    PartialAmount,
    Status,
    WorkType,
    CashPending,
    Approve,
    Verified,
    AccountantVerified,
    CancelStatus,
    CreatedAt,
    UpdatedAt,
}
