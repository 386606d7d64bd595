//! Expense repository interface

use async_trait::async_trait;

use super::model::{DieselExpense, DieselStatus, Expense};
use crate::domain::DomainResult;

#[async_trait]
pub trait ExpenseRepository: Send + Sync {
    async fn save_expense(&self, expense: Expense) -> DomainResult<()>;
    /// Returns the updated expense, `NotFound` if it does not exist.
    async fn set_expense_approval(&self, id: &str, approve: bool) -> DomainResult<Expense>;
    async fn save_diesel(&self, diesel: DieselExpense) -> DomainResult<()>;
    async fn set_diesel_status(&self, id: &str, status: DieselStatus)
        -> DomainResult<DieselExpense>;
}
