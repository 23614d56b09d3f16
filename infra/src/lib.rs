//! # Infrastructure Layer
//!
//! Concrete implementations of the core repository and client traits:
//!
//! - **Database**: MySQL repositories using SQLx (see `schema.sql` for the
//!   table layout)
//! - **Gateway**: reqwest client for the hardware status feed

use thiserror::Error;

pub mod database;
pub mod gateway;

/// Infrastructure-level errors raised while constructing or operating
/// external resources.
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}
