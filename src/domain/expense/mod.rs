pub mod model;
pub mod repository;

pub use model::{DieselExpense, DieselStatus, Expense};
pub use repository::ExpenseRepository;
