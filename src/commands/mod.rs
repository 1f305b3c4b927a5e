//! CLI commands operating directly on the post store

pub mod delete;
pub mod list;
pub mod new;
pub mod show;
