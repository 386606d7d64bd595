//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::actor::ActorRepository;
use crate::domain::aggregation::AggregationRepository;
use crate::domain::booking::BookingRepository;
use crate::domain::expense::ExpenseRepository;
use crate::domain::ledger::LedgerRepository;
use crate::domain::repositories::RepositoryProvider;

use super::actor_repository::SeaOrmActorRepository;
use super::aggregation_repository::SeaOrmAggregationRepository;
use super::booking_repository::SeaOrmBookingRepository;
use super::expense_repository::SeaOrmExpenseRepository;
use super::ledger_repository::SeaOrmLedgerRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let booking = repos.bookings().find_by_file_number("RSA-0042").await?;
/// let driver = repos.actors().find(&ActorRef::driver(id)).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    bookings: SeaOrmBookingRepository,
    actors: SeaOrmActorRepository,
    ledger: SeaOrmLedgerRepository,
    expenses: SeaOrmExpenseRepository,
    aggregations: SeaOrmAggregationRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            bookings: SeaOrmBookingRepository::new(db.clone()),
            actors: SeaOrmActorRepository::new(db.clone()),
            ledger: SeaOrmLedgerRepository::new(db.clone()),
            expenses: SeaOrmExpenseRepository::new(db.clone()),
            aggregations: SeaOrmAggregationRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn bookings(&self) -> &dyn BookingRepository {
        &self.bookings
    }

    fn actors(&self) -> &dyn ActorRepository {
        &self.actors
    }

    fn ledger(&self) -> &dyn LedgerRepository {
        &self.ledger
    }

    fn expenses(&self) -> &dyn ExpenseRepository {
        &self.expenses
    }

    fn aggregations(&self) -> &dyn AggregationRepository {
        &self.aggregations
    }
}
