pub mod actors;
pub mod bookings;
pub mod expenses;
pub mod health;
pub mod ledger;
pub mod metrics;
