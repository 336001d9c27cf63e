//! Integration tests for the nanobot-deploy CLI
//!
//! These tests spawn the actual binary and test end-to-end behavior. None of
//! them touch Docker, swap or git: every path exits before the first host
//! mutation.

mod cli_tests;
mod update_command;
