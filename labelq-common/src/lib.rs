//! Shared types and infrastructure for labelq services
//!
//! Contains the common error type, configuration resolution, and the
//! database layer (pool initialization, schema, models).

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
