pub mod actor;
pub mod aggregation;
pub mod booking;
pub mod expense;
pub mod ledger;
pub mod money;
pub mod period;
pub mod repositories;

// Re-export commonly used types
pub use actor::{Actor, ActorKind, ActorRef, FinancialSnapshot, MonthlyFigures};
pub use aggregation::{AggregationRepository, CashScope, SalaryTotals};
pub use booking::{Booking, BookingEvent, BookingStatus, NewBooking, TransitionPolicy, WorkType};
pub use money::{Money, MoneyError};
pub use period::MonthWindow;
pub use repositories::{DomainResult, RepositoryProvider};

pub use crate::shared::errors::DomainError;
