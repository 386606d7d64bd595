//! Booking aggregate
//!
//! Contains the Booking entity, its status progression, and repository interface.

pub mod model;
pub mod repository;
pub mod status;

pub use model::{Booking, BookingStatus, Creator, CreatorKind, NewBooking, WorkType};
pub use repository::{BookingFilter, BookingPatch, BookingRepository};
pub use status::{BookingEvent, StatusMachine, TransitionPolicy};
