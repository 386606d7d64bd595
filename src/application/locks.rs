//! Per-actor async locks
//!
//! Reconciliation of one actor reads several aggregates and then overwrites
//! the cached snapshot. Runs for the same actor are serialized here; runs for
//! different actors never share a lock.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::actor::ActorRef;

#[derive(Default)]
pub struct ActorLocks {
    locks: DashMap<ActorRef, Arc<Mutex<()>>>,
}

impl ActorLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `actor`. The guard releases on drop.
    pub async fn acquire(&self, actor: &ActorRef) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(actor.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    /// Number of actors that have been locked at least once.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn same_actor_is_serialized() {
        let locks = Arc::new(ActorLocks::new());
        let inside = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let (locks, inside, peak) = (locks.clone(), inside.clone(), peak.clone());
            tasks.push(tokio::spawn(async move {
                let _guard = locks.acquire(&ActorRef::driver("d1")).await;
                let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                inside.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for t in tasks {
            t.await.unwrap();
        }

        assert_eq!(peak.load(Ordering::SeqCst), 1);
        assert_eq!(locks.len(), 1);
    }

    #[tokio::test]
    async fn different_actors_do_not_contend() {
        let locks = ActorLocks::new();
        let _driver = locks.acquire(&ActorRef::driver("x")).await;

        let provider = tokio::time::timeout(
            Duration::from_millis(100),
            locks.acquire(&ActorRef::provider("x")),
        )
        .await;
        assert!(provider.is_ok());
    }
}
