//! Ledger repository interface
//!
//! Insert and read only; entries are never updated or deleted.

use async_trait::async_trait;

use super::model::{Advance, SalaryTransaction};
use crate::domain::actor::ActorRef;
use crate::domain::DomainResult;

#[async_trait]
pub trait LedgerRepository: Send + Sync {
    async fn append_advance(&self, advance: Advance) -> DomainResult<()>;
    /// Newest first.
    async fn advances_for(&self, actor: &ActorRef) -> DomainResult<Vec<Advance>>;
    async fn append_salary_transaction(&self, tx: SalaryTransaction) -> DomainResult<()>;
    async fn find_salary_transaction(
        &self,
        actor: &ActorRef,
        transaction_id: &str,
    ) -> DomainResult<Option<SalaryTransaction>>;
}
