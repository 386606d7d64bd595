//! Drivers, providers and companies with their cached financial snapshot

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
