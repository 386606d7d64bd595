//! Application services

mod actor;
mod aggregation;
mod booking;
mod expense;
mod ledger;
mod reconciliation;

pub use actor::ActorService;
pub use aggregation::AggregationEngine;
pub use booking::{BookingService, BookingUpdate, SalaryTransfer, Settlement};
pub use expense::ExpenseService;
pub use ledger::{LedgerService, NewAdvance};
pub use reconciliation::{Clock, ReconciliationService};
