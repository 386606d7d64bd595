//! Actor domain entities: drivers, providers and companies together with the
//! cached financial snapshot the reconciliation service materializes onto them.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::domain::money::Money;

/// Which kind of party an [`ActorRef`] points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorKind {
    Driver,
    Provider,
    Company,
}

impl ActorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Driver => "Driver",
            Self::Provider => "Provider",
            Self::Company => "Company",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Driver" => Some(Self::Driver),
            "Provider" => Some(Self::Provider),
            "Company" => Some(Self::Company),
            _ => None,
        }
    }

    /// Whether ledger entries (advances, salary payouts) may reference this kind.
    pub fn holds_ledger(&self) -> bool {
        matches!(self, Self::Driver | Self::Provider)
    }
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tagged reference to an actor: the kind travels with the id instead of
/// being looked up by collection name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActorRef {
    pub kind: ActorKind,
    pub id: String,
}

impl ActorRef {
    pub fn new(kind: ActorKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }

    pub fn driver(id: impl Into<String>) -> Self {
        Self::new(ActorKind::Driver, id)
    }

    pub fn provider(id: impl Into<String>) -> Self {
        Self::new(ActorKind::Provider, id)
    }

    pub fn company(id: impl Into<String>) -> Self {
        Self::new(ActorKind::Company, id)
    }
}

impl fmt::Display for ActorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// Month-scoped figures shown next to a driver's balance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonthlyFigures {
    pub diesel_expense: Money,
    pub expense: Money,
    pub total_expense: Money,
    pub salary: Money,
    pub advance: Money,
}

/// Derived financial state of an actor.
///
/// Never edited field by field: it is computed in one go from aggregation
/// results and then written back as a whole.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FinancialSnapshot {
    pub cash_in_hand: Money,
    /// Salary still owed (net of transfers for drivers).
    pub salary: Money,
    pub balance: Money,
    pub monthly: MonthlyFigures,
}

impl FinancialSnapshot {
    /// Driver snapshot. The balance is not clamped and may go negative.
    pub fn for_driver(
        net_total: Money,
        salary: Money,
        advance: Money,
        monthly: MonthlyFigures,
    ) -> Self {
        let cash_in_hand = net_total + advance;
        Self {
            cash_in_hand,
            salary,
            balance: driver_balance(cash_in_hand, salary),
            monthly,
        }
    }

    /// Provider snapshot. The balance is clamped, see [`calculate_balance_amount`].
    pub fn for_provider(net_total: Money, salary: Money, advance: Money) -> Self {
        let cash_in_hand = net_total + advance;
        Self {
            cash_in_hand,
            salary,
            balance: calculate_balance_amount(cash_in_hand, salary),
            monthly: MonthlyFigures::default(),
        }
    }

    /// Company snapshot: what the company still owes on completed jobs.
    pub fn for_company(net_total: Money) -> Self {
        Self {
            cash_in_hand: net_total,
            salary: Money::ZERO,
            balance: net_total,
            monthly: MonthlyFigures::default(),
        }
    }
}

/// Driver balance: `cash_in_hand - salary`, unclamped.
pub fn driver_balance(cash_in_hand: Money, salary: Money) -> Money {
    cash_in_hand - salary
}

/// Provider balance: zero when there is no cash in hand or it does not cover
/// the salary, otherwise `cash_in_hand - salary`.
///
/// Drivers are deliberately not clamped; the two rules differ and both are
/// kept until the business decides which one is right.
pub fn calculate_balance_amount(cash_in_hand: Money, salary: Money) -> Money {
    if !cash_in_hand.is_positive() || cash_in_hand < salary {
        Money::ZERO
    } else {
        cash_in_hand - salary
    }
}

/// A registered driver, provider or company.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: String,
    pub kind: ActorKind,
    pub name: String,
    pub phone: Option<String>,
    pub snapshot: FinancialSnapshot,
    /// When the snapshot was last materialized; `None` until the first run.
    pub reconciled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Actor {
    pub fn new(kind: ActorKind, name: impl Into<String>, phone: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            name: name.into(),
            phone,
            snapshot: FinancialSnapshot::default(),
            reconciled_at: None,
            created_at: Utc::now(),
        }
    }

    pub fn reference(&self) -> ActorRef {
        ActorRef::new(self.kind, self.id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_balance_is_clamped_driver_balance_is_not() {
        let cash = Money::from_major(100);
        let salary = Money::from_major(500);

        assert_eq!(calculate_balance_amount(cash, salary), Money::ZERO);
        assert_eq!(driver_balance(cash, salary), Money::from_major(-400));
    }

    #[test]
    fn provider_balance_zero_without_cash() {
        assert_eq!(
            calculate_balance_amount(Money::ZERO, Money::ZERO),
            Money::ZERO
        );
        assert_eq!(
            calculate_balance_amount(Money::from_major(-50), Money::ZERO),
            Money::ZERO
        );
    }

    #[test]
    fn provider_balance_when_cash_covers_salary() {
        assert_eq!(
            calculate_balance_amount(Money::from_major(900), Money::from_major(300)),
            Money::from_major(600)
        );
    }

    #[test]
    fn snapshot_adds_one_off_advance_to_cash() {
        let s = FinancialSnapshot::for_driver(
            Money::from_major(750),
            Money::from_major(1500),
            Money::from_major(50),
            MonthlyFigures::default(),
        );
        assert_eq!(s.cash_in_hand, Money::from_major(800));
        assert_eq!(s.balance, Money::from_major(-700));

        let p = FinancialSnapshot::for_provider(
            Money::from_major(750),
            Money::from_major(1500),
            Money::from_major(50),
        );
        assert_eq!(p.cash_in_hand, Money::from_major(800));
        assert_eq!(p.balance, Money::ZERO);
    }

    #[test]
    fn actor_kind_roundtrip() {
        for kind in [ActorKind::Driver, ActorKind::Provider, ActorKind::Company] {
            assert_eq!(ActorKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(ActorKind::from_str("Showroom"), None);
        assert!(!ActorKind::Company.holds_ledger());
    }
}
