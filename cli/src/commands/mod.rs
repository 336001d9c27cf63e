//! Command implementations

pub mod agent;
pub mod logs;
pub mod setup;
pub mod status;
pub mod update;
pub mod version;
