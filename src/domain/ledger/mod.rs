pub mod model;
pub mod repository;

pub use model::{Advance, AdvanceType, CorrectionLine, SalaryTransaction};
pub use repository::LedgerRepository;
