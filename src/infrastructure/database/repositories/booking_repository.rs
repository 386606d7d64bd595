//! SeaORM implementation of BookingRepository

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::domain::booking::{
    Booking, BookingFilter, BookingPatch, BookingRepository, BookingStatus, Creator, CreatorKind,
    WorkType,
};
use crate::domain::money::Money;
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::booking;
use crate::shared::pagination::{PageRequest, PaginatedResult};

pub struct SeaOrmBookingRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn string_to_work_type(booking_id: &str, s: &str) -> DomainResult<WorkType> {
    WorkType::from_str(s).ok_or_else(|| {
        DomainError::Database(format!(
            "booking {} has unknown work type '{}'",
            booking_id, s
        ))
    })
}

fn model_to_domain(b: booking::Model) -> DomainResult<Booking> {
    let work_type = string_to_work_type(&b.id, &b.work_type)?;
    let created_by = match (b.created_by_kind.as_deref(), b.created_by_id) {
        (Some(kind), Some(id)) => CreatorKind::from_str(kind).map(|kind| Creator { kind, id }),
        _ => None,
    };

    Ok(Booking {
        id: b.id,
        file_number: b.file_number,
        driver_id: b.driver_id,
        provider_id: b.provider_id,
        showroom_id: b.showroom_id,
        company_id: b.company_id,
        created_by,
        total_amount: Money::from_minor(b.total_amount),
        received_amount: Money::from_minor(b.received_amount),
        driver_salary: Money::from_minor(b.driver_salary),
        transfered_salary: Money::from_minor(b.transfered_salary),
        payable_amount_for_driver: Money::from_minor(b.payable_amount_for_driver),
        payable_amount_for_provider: Money::from_minor(b.payable_amount_for_provider),
        insurance_amount: Money::from_minor(b.insurance_amount),
        adjustment_value: Money::from_minor(b.adjustment_value),
        partial_payment: b.partial_payment,
        partial_amount: Money::from_minor(b.partial_amount),
        status: BookingStatus::from_label(&b.status),
        work_type,
        cash_pending: b.cash_pending,
        approve: b.approve,
        verified: b.verified,
        accountant_verified: b.accountant_verified,
        cancel_status: b.cancel_status,
        created_at: b.created_at,
        updated_at: b.updated_at,
    })
}

fn domain_to_active(b: Booking) -> booking::ActiveModel {
    let (created_by_kind, created_by_id) = match b.created_by {
        Some(c) => (Some(c.kind.as_str().to_string()), Some(c.id)),
        None => (None, None),
    };

    booking::ActiveModel {
        id: Set(b.id),
        file_number: Set(b.file_number),
        driver_id: Set(b.driver_id),
        provider_id: Set(b.provider_id),
        showroom_id: Set(b.showroom_id),
        company_id: Set(b.company_id),
        created_by_kind: Set(created_by_kind),
        created_by_id: Set(created_by_id),
        total_amount: Set(b.total_amount.minor()),
        received_amount: Set(b.received_amount.minor()),
        driver_salary: Set(b.driver_salary.minor()),
        transfered_salary: Set(b.transfered_salary.minor()),
        payable_amount_for_driver: Set(b.payable_amount_for_driver.minor()),
        payable_amount_for_provider: Set(b.payable_amount_for_provider.minor()),
        insurance_amount: Set(b.insurance_amount.minor()),
        adjustment_value: Set(b.adjustment_value.minor()),
        partial_payment: Set(b.partial_payment),
        partial_amount: Set(b.partial_amount.minor()),
        status: Set(b.status.as_str().to_string()),
        work_type: Set(b.work_type.as_str().to_string()),
        cash_pending: Set(b.cash_pending),
        approve: Set(b.approve),
        verified: Set(b.verified),
        accountant_verified: Set(b.accountant_verified),
        cancel_status: Set(b.cancel_status),
        created_at: Set(b.created_at),
        updated_at: Set(b.updated_at),
    }
}

fn set_if<T>(value: Option<T>) -> sea_orm::ActiveValue<T>
where
    T: Into<sea_orm::Value>,
{
    value.map_or(NotSet, Set)
}

fn set_money(value: Option<Money>) -> sea_orm::ActiveValue<i64> {
    set_if(value.map(Money::minor))
}

/// Active model with only the patched columns set.
fn patch_to_active(id: &str, p: BookingPatch) -> booking::ActiveModel {
    booking::ActiveModel {
        id: Set(id.to_string()),
        status: set_if(p.status.map(|s| s.as_str().to_string())),
        cancel_status: set_if(p.cancel_status),
        driver_id: set_if(p.driver_id.map(Some)),
        provider_id: set_if(p.provider_id.map(Some)),
        showroom_id: set_if(p.showroom_id.map(Some)),
        company_id: set_if(p.company_id.map(Some)),
        total_amount: set_money(p.total_amount),
        received_amount: set_money(p.received_amount),
        driver_salary: set_money(p.driver_salary),
        payable_amount_for_driver: set_money(p.payable_amount_for_driver),
        payable_amount_for_provider: set_money(p.payable_amount_for_provider),
        insurance_amount: set_money(p.insurance_amount),
        adjustment_value: set_money(p.adjustment_value),
        partial_payment: set_if(p.partial_payment),
        partial_amount: set_money(p.partial_amount),
        cash_pending: set_if(p.cash_pending.map(Some)),
        approve: set_if(p.approve),
        verified: set_if(p.verified),
        accountant_verified: set_if(p.accountant_verified),
        updated_at: Set(Utc::now()),
        file_number: NotSet,
        created_by_kind: NotSet,
        created_by_id: NotSet,
        transfered_salary: NotSet,
        work_type: NotSet,
        created_at: NotSet,
    }
}

// ── BookingRepository impl ──────────────────────────────────────

#[async_trait]
impl BookingRepository for SeaOrmBookingRepository {
    async fn save(&self, b: Booking) -> DomainResult<()> {
        debug!("Saving booking: {} ({})", b.file_number, b.id);
        domain_to_active(b).insert(&self.db).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Booking>> {
        let model = booking::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?;
        model.map(model_to_domain).transpose()
    }

    async fn find_by_file_number(&self, file_number: &str) -> DomainResult<Option<Booking>> {
        let model = booking::Entity::find()
            .filter(booking::Column::FileNumber.eq(file_number))
            .one(&self.db)
            .await?;
        model.map(model_to_domain).transpose()
    }

    async fn patch(&self, id: &str, patch: BookingPatch) -> DomainResult<Booking> {
        debug!("Patching booking: {} ({:?})", id, patch);

        let exists = booking::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
            .is_some();
        if !exists {
            return Err(DomainError::not_found("Booking", id));
        }

        let model = patch_to_active(id, patch).update(&self.db).await?;
        model_to_domain(model)
    }

    async fn add_transfered_salary(&self, id: &str, amount: Money) -> DomainResult<()> {
        debug!("Adding {} transferred salary to booking {}", amount, id);

        let raised = Expr::col(booking::Column::TransferedSalary).add(amount.minor());
        let result = booking::Entity::update_many()
            .col_expr(booking::Column::TransferedSalary, raised.clone())
            .col_expr(booking::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(booking::Column::Id.eq(id))
            .filter(Expr::expr(raised).lte(Expr::col(booking::Column::DriverSalary)))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return match self.find_by_id(id).await? {
                None => Err(DomainError::not_found("Booking", id)),
                Some(b) => Err(DomainError::Conflict(format!(
                    "booking {} has only {} unpaid salary, cannot transfer {}",
                    b.file_number,
                    b.unpaid_salary(),
                    amount
                ))),
            };
        }
        Ok(())
    }

    async fn list(
        &self,
        filter: &BookingFilter,
        page: PageRequest,
    ) -> DomainResult<PaginatedResult<Booking>> {
        let mut query = booking::Entity::find();
        if let Some(status) = &filter.status {
            query = query.filter(booking::Column::Status.eq(status.as_str()));
        }
        if let Some(id) = &filter.driver_id {
            query = query.filter(booking::Column::DriverId.eq(id.as_str()));
        }
        if let Some(id) = &filter.provider_id {
            query = query.filter(booking::Column::ProviderId.eq(id.as_str()));
        }
        if let Some(id) = &filter.company_id {
            query = query.filter(booking::Column::CompanyId.eq(id.as_str()));
        }

        let total = query.clone().count(&self.db).await?;
        let models = query
            .order_by_desc(booking::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit as u64)
            .all(&self.db)
            .await?;

        let items = models
            .into_iter()
            .map(model_to_domain)
            .collect::<DomainResult<Vec<_>>>()?;
        Ok(PaginatedResult::new(
            items,
            total,
            page.page,
            page.limit,
        ))
    }

    async fn find_with_unpaid_salary(&self, driver_id: &str) -> DomainResult<Vec<Booking>> {
        let models = booking::Entity::find()
            .filter(booking::Column::DriverId.eq(driver_id))
            .filter(booking::Column::Verified.eq(true))
            .filter(
                Expr::col(booking::Column::DriverSalary)
                    .gt(Expr::col(booking::Column::TransferedSalary)),
            )
            .order_by_asc(booking::Column::CreatedAt)
            .all(&self.db)
            .await?;
        models.into_iter().map(model_to_domain).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::NewBooking;
    use crate::infrastructure::database::testing::memory_db;

    fn new_booking(file_number: &str, driver: &str) -> Booking {
        Booking::new(NewBooking {
            file_number: file_number.into(),
            work_type: WorkType::PaymentWork,
            driver_id: Some(driver.into()),
            provider_id: None,
            showroom_id: None,
            company_id: Some("company-1".into()),
            created_by: Some(Creator {
                kind: CreatorKind::ShowroomStaff,
                id: "staff-9".into(),
            }),
            total_amount: Money::from_major(1200),
            driver_salary: Money::from_major(400),
            payable_amount_for_driver: Money::ZERO,
            payable_amount_for_provider: Money::ZERO,
            insurance_amount: Money::ZERO,
            adjustment_value: Money::ZERO,
        })
    }

    #[tokio::test]
    async fn save_and_reload_keeps_fields() {
        let repo = SeaOrmBookingRepository::new(memory_db().await);
        let mut b = new_booking("F-1", "d1");
        b.set_status(BookingStatus::Custom("Waiting for crane".into()));
        let id = b.id.clone();
        repo.save(b).await.unwrap();

        let loaded = repo.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(loaded.file_number, "F-1");
        assert_eq!(loaded.total_amount, Money::from_major(1200));
        assert_eq!(loaded.cash_pending, None);
        assert_eq!(
            loaded.status,
            BookingStatus::Custom("Waiting for crane".into())
        );
        assert_eq!(loaded.created_by.unwrap().kind, CreatorKind::ShowroomStaff);

        let by_file = repo.find_by_file_number("F-1").await.unwrap();
        assert_eq!(by_file.map(|b| b.id), Some(id));
    }

    #[tokio::test]
    async fn patch_missing_booking_is_not_found() {
        let repo = SeaOrmBookingRepository::new(memory_db().await);
        let err = repo
            .patch("missing", BookingPatch::status(BookingStatus::Cancelled))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn patch_leaves_other_columns_alone() {
        let repo = SeaOrmBookingRepository::new(memory_db().await);
        let b = new_booking("F-3", "d1");
        let id = b.id.clone();
        repo.save(b).await.unwrap();

        repo.patch(
            &id,
            BookingPatch {
                received_amount: Some(Money::from_major(700)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let stored = repo
            .patch(
                &id,
                BookingPatch {
                    verified: Some(true),
                    cash_pending: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(stored.verified);
        assert_eq!(stored.cash_pending, Some(true));
        assert_eq!(stored.received_amount, Money::from_major(700));
        assert_eq!(stored.total_amount, Money::from_major(1200));
        assert_eq!(stored.company_id.as_deref(), Some("company-1"));
    }

    #[tokio::test]
    async fn cancelling_patch_sets_cancel_status() {
        let repo = SeaOrmBookingRepository::new(memory_db().await);
        let b = new_booking("F-4", "d1");
        let id = b.id.clone();
        repo.save(b).await.unwrap();

        let stored = repo
            .patch(&id, BookingPatch::status(BookingStatus::Cancelled))
            .await
            .unwrap();
        assert_eq!(stored.status, BookingStatus::Cancelled);
        assert!(stored.cancel_status);
    }

    #[tokio::test]
    async fn transferred_salary_cannot_pass_driver_salary() {
        let repo = SeaOrmBookingRepository::new(memory_db().await);
        let b = new_booking("F-5", "d1");
        let id = b.id.clone();
        repo.save(b).await.unwrap();

        repo.add_transfered_salary(&id, Money::from_major(300))
            .await
            .unwrap();
        let err = repo
            .add_transfered_salary(&id, Money::from_major(101))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        repo.add_transfered_salary(&id, Money::from_major(100))
            .await
            .unwrap();

        let stored = repo.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.transfered_salary, Money::from_major(400));
        assert!(matches!(
            repo.add_transfered_salary("missing", Money::from_major(1)).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn unknown_work_type_is_reported() {
        let db = memory_db().await;
        let repo = SeaOrmBookingRepository::new(db.clone());
        let b = new_booking("F-6", "d1");
        let id = b.id.clone();
        repo.save(b).await.unwrap();

        booking::Entity::update_many()
            .col_expr(booking::Column::WorkType, Expr::value("TowWork"))
            .filter(booking::Column::Id.eq(id.as_str()))
            .exec(&db)
            .await
            .unwrap();

        let err = repo.find_by_id(&id).await.unwrap_err();
        assert!(matches!(err, DomainError::Database(_)));
    }

    #[tokio::test]
    async fn list_filters_and_paginates() {
        let repo = SeaOrmBookingRepository::new(memory_db().await);
        for i in 0..5 {
            repo.save(new_booking(&format!("A-{i}"), "d1")).await.unwrap();
        }
        repo.save(new_booking("B-0", "d2")).await.unwrap();

        let filter = BookingFilter {
            driver_id: Some("d1".into()),
            ..Default::default()
        };
        let page = repo.list(&filter, PageRequest::new(2, 2)).await.unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items.len(), 2);
    }

    #[tokio::test]
    async fn unpaid_salary_lookup_skips_unverified_and_settled() {
        let repo = SeaOrmBookingRepository::new(memory_db().await);

        let mut open = new_booking("S-1", "d1");
        open.verified = true;
        let mut paid = new_booking("S-2", "d1");
        paid.verified = true;
        paid.transfered_salary = paid.driver_salary;
        let unverified = new_booking("S-3", "d1");

        repo.save(open).await.unwrap();
        repo.save(paid).await.unwrap();
        repo.save(unverified).await.unwrap();

        let found = repo.find_with_unpaid_salary("d1").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].file_number, "S-1");
    }
}
