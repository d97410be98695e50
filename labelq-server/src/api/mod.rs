//! HTTP API handlers for labelq-server

pub mod assignment;
pub mod auth;
pub mod error;
pub mod health;
pub mod labeling;

pub use assignment::get_next_datapoint;
pub use auth::{auth_middleware, Identity};
pub use error::ApiError;
pub use health::health_routes;
pub use labeling::label_data;
