//! Bookings: intake, lifecycle, settlement and verification flags

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
