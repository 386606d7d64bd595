//! External interfaces
//!
//! - `http`: REST API with Swagger documentation

pub mod http;
