//! Database entities module

pub mod actor;
pub mod advance;
pub mod booking;
pub mod diesel_expense;
pub mod expense;
pub mod salary_transaction;

pub use actor::Entity as Actor;
pub use advance::Entity as Advance;
pub use booking::Entity as Booking;
pub use diesel_expense::Entity as DieselExpense;
pub use expense::Entity as Expense;
pub use salary_transaction::Entity as SalaryTransaction;
