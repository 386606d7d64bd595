//! Application layer: services that orchestrate the domain over the
//! repository ports.

pub mod locks;
pub mod services;

use std::sync::Arc;

pub use locks::ActorLocks;
pub use services::{
    ActorService, AggregationEngine, BookingService, BookingUpdate, Clock, ExpenseService,
    LedgerService, NewAdvance, ReconciliationService, SalaryTransfer, Settlement,
};

use crate::domain::booking::TransitionPolicy;
use crate::domain::RepositoryProvider;

/// All application services, sharing one reconciliation service.
#[derive(Clone)]
pub struct Services {
    pub reconciliation: Arc<ReconciliationService>,
    pub ledger: Arc<LedgerService>,
    pub bookings: Arc<BookingService>,
    pub expenses: Arc<ExpenseService>,
    pub actors: Arc<ActorService>,
}

impl Services {
    pub fn new(repos: Arc<dyn RepositoryProvider>, policy: TransitionPolicy) -> Self {
        Self::with_clock(repos, policy, None)
    }

    pub fn with_clock(
        repos: Arc<dyn RepositoryProvider>,
        policy: TransitionPolicy,
        clock: Option<Clock>,
    ) -> Self {
        let mut reconciliation = ReconciliationService::new(repos.clone());
        if let Some(clock) = clock {
            reconciliation = reconciliation.with_clock(clock);
        }
        let reconciliation = Arc::new(reconciliation);
        let ledger = Arc::new(LedgerService::new(repos.clone(), reconciliation.clone()));

        Self {
            bookings: Arc::new(BookingService::new(
                repos.clone(),
                reconciliation.clone(),
                ledger.clone(),
                policy,
            )),
            expenses: Arc::new(ExpenseService::new(repos.clone(), reconciliation.clone())),
            actors: Arc::new(ActorService::new(repos, reconciliation.clone())),
            ledger,
            reconciliation,
        }
    }
}
