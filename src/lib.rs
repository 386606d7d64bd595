//! # Roadside Ledger
//!
//! Booking ledger and financial reconciliation service for a roadside
//! assistance operation: bookings move through a status lifecycle, cash is
//! collected by drivers and providers, and each party carries a cached
//! financial snapshot recomputed from the raw records.
//!
//! ## Architecture
//!
//! - **domain**: entities, money, the month window and repository traits
//! - **application**: aggregation, reconciliation, ledger and booking services
//! - **infrastructure**: SeaORM entities, migrations and repositories
//! - **interfaces**: REST API with Swagger documentation
//! - **server**: runtime bootstrap and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

pub use infrastructure::{init_database, run_migrations, DatabaseConfig, SeaOrmRepositoryProvider};

pub use interfaces::http::create_api_router;
