//! Domain layer: pure provisioning types, thresholds, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod container;
pub mod error;
pub mod host;
pub mod profile;
pub mod swap;

pub use config::DeployConfig;
pub use container::{BestEffort, ContainerSummary, RunSpec};
pub use error::{ConfigError, DispatchError, SetupError};
pub use host::{Architecture, Host};
pub use profile::{PlatformProfile, ProfileChoice, SwapPolicy, UpdateTarget};
