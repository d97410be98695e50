//! Database layer: pool initialization, schema, and models

mod init;
mod models;

pub use init::{create_schema, init_database};
pub use models::{DatasetItem, Interaction, InteractionStatus};
