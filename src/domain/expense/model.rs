//! Driver expenses that feed the monthly figures of a driver snapshot.

use chrono::{DateTime, Utc};

use crate::domain::money::Money;

#[derive(Debug, Clone)]
pub struct Expense {
    pub id: String,
    pub driver_id: String,
    pub amount: Money,
    pub description: Option<String>,
    pub approve: bool,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(driver_id: impl Into<String>, amount: Money, description: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            driver_id: driver_id.into(),
            amount,
            description,
            approve: false,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DieselStatus {
    Pending,
    Approved,
    Rejected,
}

impl DieselStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(Self::Pending),
            "Approved" => Some(Self::Approved),
            "Rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DieselExpense {
    pub id: String,
    pub driver_id: String,
    pub amount: Money,
    pub status: DieselStatus,
    pub created_at: DateTime<Utc>,
}

impl DieselExpense {
    pub fn new(driver_id: impl Into<String>, amount: Money) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            driver_id: driver_id.into(),
            amount,
            status: DieselStatus::Pending,
            created_at: Utc::now(),
        }
    }
}
