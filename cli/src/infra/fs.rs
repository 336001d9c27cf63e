//! `LocalFs` for `LinuxHost`.
//!
//! The config dir lives under the operator's home, so it is created without
//! elevated privileges.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, LocalFs};
use crate::infra::host::LinuxHost;

impl<R: CommandRunner> LocalFs for LinuxHost<R> {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path).with_context(|| format!("creating {}", path.display()))
    }
}
