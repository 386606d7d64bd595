//! SeaORM implementation of LedgerRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};
use serde::{Deserialize, Serialize};

use crate::domain::actor::{ActorKind, ActorRef};
use crate::domain::ledger::{
    Advance, AdvanceType, CorrectionLine, LedgerRepository, SalaryTransaction,
};
use crate::domain::money::Money;
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{advance, salary_transaction};
use crate::shared::errors::InfraError;

pub struct SeaOrmLedgerRepository {
    db: DatabaseConnection,
}

impl SeaOrmLedgerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

/// Stored shape of one correction line inside `advances.lines`.
#[derive(Debug, Serialize, Deserialize)]
struct StoredLine {
    file_number: String,
    driver_salary: i64,
    balance_salary: i64,
    transfered_salary: i64,
}

fn encode_lines(lines: &[CorrectionLine]) -> Result<String, InfraError> {
    let stored: Vec<StoredLine> = lines
        .iter()
        .map(|l| StoredLine {
            file_number: l.file_number.clone(),
            driver_salary: l.driver_salary.minor(),
            balance_salary: l.balance_salary.minor(),
            transfered_salary: l.transfered_salary.minor(),
        })
        .collect();
    Ok(serde_json::to_string(&stored)?)
}

fn decode_lines(raw: &str) -> Result<Vec<CorrectionLine>, InfraError> {
    let stored: Vec<StoredLine> = serde_json::from_str(raw)?;
    Ok(stored
        .into_iter()
        .map(|l| CorrectionLine {
            file_number: l.file_number,
            driver_salary: Money::from_minor(l.driver_salary),
            balance_salary: Money::from_minor(l.balance_salary),
            transfered_salary: Money::from_minor(l.transfered_salary),
        })
        .collect())
}

fn infra_err(e: InfraError) -> DomainError {
    DomainError::Database(e.to_string())
}

fn actor_ref(kind: &str, id: String) -> DomainResult<ActorRef> {
    let kind = ActorKind::from_str(kind)
        .ok_or_else(|| DomainError::Database(format!("unknown actor kind '{}'", kind)))?;
    Ok(ActorRef::new(kind, id))
}

fn advance_to_domain(a: advance::Model) -> DomainResult<Advance> {
    Ok(Advance {
        actor: actor_ref(&a.actor_kind, a.actor_id)?,
        lines: decode_lines(&a.lines).map_err(infra_err)?,
        id: a.id,
        added_advance: Money::from_minor(a.added_advance),
        advance: Money::from_minor(a.advance),
        cash_in_hand: Money::from_minor(a.cash_in_hand),
        advance_type: AdvanceType::from_label(&a.advance_type),
        remark: a.remark,
        created_at: a.created_at,
    })
}

fn salary_tx_to_domain(t: salary_transaction::Model) -> DomainResult<SalaryTransaction> {
    Ok(SalaryTransaction {
        actor: actor_ref(&t.actor_kind, t.actor_id)?,
        id: t.id,
        transaction_id: t.transaction_id,
        amount: Money::from_minor(t.amount),
        created_at: t.created_at,
    })
}

// ── LedgerRepository impl ───────────────────────────────────────

#[async_trait]
impl LedgerRepository for SeaOrmLedgerRepository {
    async fn append_advance(&self, a: Advance) -> DomainResult<()> {
        debug!("Appending {} entry for {}", a.advance_type.as_str(), a.actor);
        let model = advance::ActiveModel {
            lines: Set(encode_lines(&a.lines).map_err(infra_err)?),
            id: Set(a.id),
            actor_kind: Set(a.actor.kind.as_str().to_string()),
            actor_id: Set(a.actor.id),
            added_advance: Set(a.added_advance.minor()),
            advance: Set(a.advance.minor()),
            cash_in_hand: Set(a.cash_in_hand.minor()),
            advance_type: Set(a.advance_type.as_str().to_string()),
            remark: Set(a.remark),
            created_at: Set(a.created_at),
        };
        model.insert(&self.db).await?;
        Ok(())
    }

    async fn advances_for(&self, actor: &ActorRef) -> DomainResult<Vec<Advance>> {
        let models = advance::Entity::find()
            .filter(advance::Column::ActorKind.eq(actor.kind.as_str()))
            .filter(advance::Column::ActorId.eq(actor.id.as_str()))
            .order_by_desc(advance::Column::CreatedAt)
            .all(&self.db)
            .await?;
        models.into_iter().map(advance_to_domain).collect()
    }

    async fn append_salary_transaction(&self, t: SalaryTransaction) -> DomainResult<()> {
        debug!("Appending salary transaction {} for {}", t.transaction_id, t.actor);
        let duplicate = format!(
            "salary transaction {} already recorded for {}",
            t.transaction_id, t.actor
        );
        let model = salary_transaction::ActiveModel {
            id: Set(t.id),
            actor_kind: Set(t.actor.kind.as_str().to_string()),
            actor_id: Set(t.actor.id),
            transaction_id: Set(t.transaction_id),
            amount: Set(t.amount.minor()),
            created_at: Set(t.created_at),
        };
        match model.insert(&self.db).await {
            Ok(_) => Ok(()),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(DomainError::Conflict(duplicate))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_salary_transaction(
        &self,
        actor: &ActorRef,
        transaction_id: &str,
    ) -> DomainResult<Option<SalaryTransaction>> {
        salary_transaction::Entity::find()
            .filter(salary_transaction::Column::ActorKind.eq(actor.kind.as_str()))
            .filter(salary_transaction::Column::ActorId.eq(actor.id.as_str()))
            .filter(salary_transaction::Column::TransactionId.eq(transaction_id))
            .one(&self.db)
            .await?
            .map(salary_tx_to_domain)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::testing::memory_db;
    use chrono::{Duration, Utc};

    fn entry(actor: ActorRef, amount: i64, minutes_ago: i64) -> Advance {
        Advance {
            id: uuid::Uuid::new_v4().to_string(),
            actor,
            added_advance: Money::from_major(amount),
            advance: Money::from_major(amount),
            cash_in_hand: Money::ZERO,
            advance_type: AdvanceType::Correction,
            remark: Some("month end".into()),
            lines: vec![CorrectionLine {
                file_number: "F-1".into(),
                driver_salary: Money::from_major(400),
                balance_salary: Money::from_major(150),
                transfered_salary: Money::from_major(250),
            }],
            created_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[tokio::test]
    async fn advances_are_scoped_and_newest_first() {
        let repo = SeaOrmLedgerRepository::new(memory_db().await);
        let d = ActorRef::driver("d1");
        repo.append_advance(entry(d.clone(), 10, 30)).await.unwrap();
        repo.append_advance(entry(d.clone(), 20, 5)).await.unwrap();
        repo.append_advance(entry(ActorRef::provider("d1"), 99, 1))
            .await
            .unwrap();

        let list = repo.advances_for(&d).await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].added_advance, Money::from_major(20));
        assert_eq!(list[0].lines[0].balance_salary, Money::from_major(150));
        assert_eq!(list[0].advance_type, AdvanceType::Correction);
    }

    #[tokio::test]
    async fn salary_transaction_lookup_is_per_actor() {
        let repo = SeaOrmLedgerRepository::new(memory_db().await);
        let tx = SalaryTransaction {
            id: uuid::Uuid::new_v4().to_string(),
            actor: ActorRef::driver("d1"),
            transaction_id: "UTR-001".into(),
            amount: Money::from_major(500),
            created_at: Utc::now(),
        };
        repo.append_salary_transaction(tx).await.unwrap();

        let found = repo
            .find_salary_transaction(&ActorRef::driver("d1"), "UTR-001")
            .await
            .unwrap();
        assert_eq!(found.map(|t| t.amount), Some(Money::from_major(500)));
        assert!(repo
            .find_salary_transaction(&ActorRef::driver("d2"), "UTR-001")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn duplicate_salary_transaction_insert_is_a_conflict() {
        let repo = SeaOrmLedgerRepository::new(memory_db().await);
        let tx = |id: &str| SalaryTransaction {
            id: id.into(),
            actor: ActorRef::driver("d1"),
            transaction_id: "UTR-007".into(),
            amount: Money::from_major(250),
            created_at: Utc::now(),
        };
        repo.append_salary_transaction(tx("first")).await.unwrap();

        let err = repo.append_salary_transaction(tx("second")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }
}
