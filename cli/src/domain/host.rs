//! Host snapshot taken at the start of every pipeline run.

use serde::Serialize;

/// CPU architecture class relevant to profile selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Architecture {
    Amd64,
    Arm64,
}

impl Architecture {
    /// Classify a `uname -m` machine string. Only 64-bit ARM maps to `Arm64`.
    #[must_use]
    pub fn from_machine(machine: &str) -> Self {
        match machine.trim() {
            "aarch64" | "arm64" => Self::Arm64,
            _ => Self::Amd64,
        }
    }
}

impl std::fmt::Display for Architecture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Amd64 => "amd64",
            Self::Arm64 => "arm64",
        })
    }
}

/// Live host facts read by the preflight and installer stages.
///
/// Never persisted; re-read on every run.
#[derive(Debug, Clone, Serialize)]
pub struct Host {
    /// Raw machine string, e.g. `x86_64`.
    pub machine: String,
    pub architecture: Architecture,
    /// Total swap currently active, in KiB.
    pub swap_total_kib: u64,
    /// Whether the container runtime command is on `PATH`.
    pub runtime_installed: bool,
    pub is_root: bool,
    pub user: String,
    /// Whether `user` is a member of the runtime's privileged group.
    pub in_runtime_group: bool,
}

impl Host {
    /// Whether runtime calls will fail for lack of group membership.
    #[must_use]
    pub fn lacks_runtime_access(&self) -> bool {
        !self.is_root && !self.in_runtime_group
    }
}
