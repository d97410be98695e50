//! Database access layer for labelq-server

pub mod interactions;
pub mod items;
pub mod sessions;
