//! Actor registration and lookup

use std::sync::Arc;

use tracing::info;

use super::reconciliation::ReconciliationService;
use crate::domain::actor::{Actor, ActorKind, ActorRef};
use crate::domain::money::Money;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

pub struct ActorService {
    repos: Arc<dyn RepositoryProvider>,
    reconciliation: Arc<ReconciliationService>,
}

impl ActorService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        reconciliation: Arc<ReconciliationService>,
    ) -> Self {
        Self {
            repos,
            reconciliation,
        }
    }

    pub async fn register(
        &self,
        kind: ActorKind,
        name: &str,
        phone: Option<String>,
    ) -> DomainResult<Actor> {
        if name.trim().is_empty() {
            return Err(DomainError::Validation("name is required".into()));
        }
        let actor = Actor::new(kind, name.trim(), phone);
        self.repos.actors().save(actor.clone()).await?;
        info!(actor = %actor.reference(), name = %actor.name, "Actor registered");
        Ok(actor)
    }

    /// The actor with its cached snapshot as last reconciled.
    pub async fn get(&self, actor: &ActorRef) -> DomainResult<Actor> {
        self.repos
            .actors()
            .find(actor)
            .await?
            .ok_or_else(|| DomainError::not_found(actor.kind.as_str(), actor.id.clone()))
    }

    /// Force a reconciliation without a one-off advance.
    pub async fn reconcile(&self, actor: &ActorRef) -> DomainResult<Actor> {
        self.reconciliation.reconcile(actor, Money::ZERO).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::testing::Fixture;

    #[tokio::test]
    async fn register_then_get() {
        let fx = Fixture::new().await;
        let actor = fx
            .actors
            .register(ActorKind::Provider, "  Highway Towing ", None)
            .await
            .unwrap();
        let loaded = fx.actors.get(&actor.reference()).await.unwrap();
        assert_eq!(loaded.name, "Highway Towing");
        assert!(loaded.reconciled_at.is_none());

        let reconciled = fx.actors.reconcile(&actor.reference()).await.unwrap();
        assert!(reconciled.reconciled_at.is_some());
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let fx = Fixture::new().await;
        let err = fx
            .actors
            .register(ActorKind::Driver, "   ", None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
