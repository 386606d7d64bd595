//! Actor repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{Actor, ActorRef, FinancialSnapshot};
use crate::domain::DomainResult;

#[async_trait]
pub trait ActorRepository: Send + Sync {
    async fn save(&self, actor: Actor) -> DomainResult<()>;
    async fn find(&self, actor: &ActorRef) -> DomainResult<Option<Actor>>;
    /// Overwrite the cached snapshot and return the updated actor.
    /// Fails with `NotFound` when the actor does not exist.
    async fn store_snapshot(
        &self,
        actor: &ActorRef,
        snapshot: &FinancialSnapshot,
        reconciled_at: DateTime<Utc>,
    ) -> DomainResult<Actor>;
}
