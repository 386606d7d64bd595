//! Repository traits for the domain layer
//!
//! `RepositoryProvider` gives unified access to all per-aggregate repositories.

use super::actor::ActorRepository;
use super::aggregation::AggregationRepository;
use super::booking::BookingRepository;
use super::expense::ExpenseRepository;
use super::ledger::LedgerRepository;

pub use crate::shared::errors::DomainResult;

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let booking = repos.bookings().find_by_id("6f1c…").await?;
///     let owed = repos.aggregations().partial_payments(&ActorRef::driver("d1")).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn bookings(&self) -> &dyn BookingRepository;
    fn actors(&self) -> &dyn ActorRepository;
    fn ledger(&self) -> &dyn LedgerRepository;
    fn expenses(&self) -> &dyn ExpenseRepository;
    fn aggregations(&self) -> &dyn AggregationRepository;
}
