//! Append-only ledger entries: cash advances and salary payouts.

use chrono::{DateTime, Utc};

use crate::domain::actor::ActorRef;
use crate::domain::money::Money;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceType {
    /// Cash handed to the actor ahead of settlement
    Advance,
    /// Offsetting entry that corrects an earlier one
    Correction,
    /// Record of a salary transfer allocated over bookings
    SalaryTransfer,
    Other(String),
}

impl AdvanceType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Advance => "Advance",
            Self::Correction => "Correction",
            Self::SalaryTransfer => "SalaryTransfer",
            Self::Other(s) => s,
        }
    }

    pub fn from_label(s: &str) -> Self {
        match s {
            "Advance" => Self::Advance,
            "Correction" => Self::Correction,
            "SalaryTransfer" => Self::SalaryTransfer,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Per-booking line of a batch correction or salary allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionLine {
    pub file_number: String,
    pub driver_salary: Money,
    /// Salary still owed on the booking after this entry
    pub balance_salary: Money,
    pub transfered_salary: Money,
}

#[derive(Debug, Clone)]
pub struct Advance {
    pub id: String,
    pub actor: ActorRef,
    pub added_advance: Money,
    pub advance: Money,
    /// Actor's cached cash-in-hand when the entry was written
    pub cash_in_hand: Money,
    pub advance_type: AdvanceType,
    pub remark: Option<String>,
    pub lines: Vec<CorrectionLine>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SalaryTransaction {
    pub id: String,
    pub actor: ActorRef,
    /// External payment reference
    pub transaction_id: String,
    pub amount: Money,
    pub created_at: DateTime<Utc>,
}
