//! Infrastructure layer: concrete implementations of application port traits.
//!
//! All host I/O lives here: process execution, the Docker CLI, swap and
//! package management, git, the config file, and terminal prompts.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod command_runner;
pub mod config;
pub mod docker;
pub mod fs;
pub mod git;
pub mod host;
pub mod installer;
pub mod prompt;
pub mod swap;

#[cfg(all(test, unix))]
pub(crate) mod test_runner;
