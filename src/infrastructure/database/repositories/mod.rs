//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod actor_repository;
pub mod aggregation_repository;
pub mod booking_repository;
pub mod expense_repository;
pub mod ledger_repository;
pub mod repository_provider;

pub use actor_repository::SeaOrmActorRepository;
pub use aggregation_repository::SeaOrmAggregationRepository;
pub use booking_repository::SeaOrmBookingRepository;
pub use expense_repository::SeaOrmExpenseRepository;
pub use ledger_repository::SeaOrmLedgerRepository;
pub use repository_provider::SeaOrmRepositoryProvider;
