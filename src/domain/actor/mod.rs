//! Actor aggregate
//!
//! Drivers, providers and companies, and the financial snapshot cached on them.

pub mod model;
pub mod repository;

pub use model::{
    calculate_balance_amount, driver_balance, Actor, ActorKind, ActorRef, FinancialSnapshot,
    MonthlyFigures,
};
pub use repository::ActorRepository;
