//! Platform profiles and update-target resolution.
//!
//! A profile is selected once per run and held constant through every stage.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DispatchError;
use crate::domain::host::Architecture;

// ── Constants ────────────────────────────────────────────────────────────────

/// Swap file size created by the `amd2gb` profile.
pub const AMD_SWAP_FILE_MIB: u64 = 1024;

/// Minimum acceptable swap on `rpi4gb`, just under 2 GiB (2 097 152 KiB) so
/// a manager-reported 2048 MiB swap never trips the check through rounding.
pub const RPI_SWAP_THRESHOLD_KIB: u64 = 2_000_000;

/// Size written to the swap-size manager on `rpi4gb`.
pub const RPI_SWAP_TARGET_MIB: u64 = 2048;

// ── Profiles ─────────────────────────────────────────────────────────────────

/// Host-specific bundle of preflight strategy and base-image assumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformProfile {
    /// x86_64 host with ~2 GB RAM.
    Amd2gb,
    /// Raspberry Pi with ~4 GB RAM.
    Rpi4gb,
}

/// How preflight guarantees swap capacity for a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapPolicy {
    /// Create a fixed-size swap file only when no swap is active at all.
    CreateIfAbsent { size_mib: u64 },
    /// Grow the swap-size manager's configured size when below `threshold_kib`.
    ResizeManaged { threshold_kib: u64, target_mib: u64 },
}

impl PlatformProfile {
    pub const ALL: [Self; 2] = [Self::Amd2gb, Self::Rpi4gb];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Amd2gb => "amd2gb",
            Self::Rpi4gb => "rpi4gb",
        }
    }

    /// First-time setup subcommand for this profile.
    #[must_use]
    pub fn setup_command(self) -> &'static str {
        match self {
            Self::Amd2gb => "setup-amd2gb",
            Self::Rpi4gb => "setup-rpi4gb",
        }
    }

    #[must_use]
    pub fn swap_policy(self) -> SwapPolicy {
        match self {
            Self::Amd2gb => SwapPolicy::CreateIfAbsent {
                size_mib: AMD_SWAP_FILE_MIB,
            },
            Self::Rpi4gb => SwapPolicy::ResizeManaged {
                threshold_kib: RPI_SWAP_THRESHOLD_KIB,
                target_mib: RPI_SWAP_TARGET_MIB,
            },
        }
    }

    /// Architecture the service's base image is built for on this profile.
    #[must_use]
    pub fn architecture(self) -> Architecture {
        match self {
            Self::Amd2gb => Architecture::Amd64,
            Self::Rpi4gb => Architecture::Arm64,
        }
    }
}

impl std::fmt::Display for PlatformProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ── Update target ────────────────────────────────────────────────────────────

/// Positional argument accepted by `update`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateTarget {
    Amd,
    Rpi,
}

impl UpdateTarget {
    #[must_use]
    pub fn profile(self) -> PlatformProfile {
        match self {
            Self::Amd => PlatformProfile::Amd2gb,
            Self::Rpi => PlatformProfile::Rpi4gb,
        }
    }
}

impl FromStr for UpdateTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "amd" => Ok(Self::Amd),
            "rpi" => Ok(Self::Rpi),
            other => Err(format!("unknown target '{other}' (expected 'amd' or 'rpi')")),
        }
    }
}

// ── Resolution ───────────────────────────────────────────────────────────────

/// Result of the argument/discovery phase of profile resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileChoice {
    /// Decided without looking at the host.
    Resolved(PlatformProfile),
    /// Several profiles are enabled and none was requested; sniff the host.
    NeedsArchitecture,
}

/// Resolve the profile from an explicit target and the enabled profiles.
///
/// An explicit target always wins. Without one, a single enabled profile is
/// used as-is; several defer to [`profile_for_architecture`].
///
/// # Errors
///
/// Returns an error if no profile is enabled, or the requested one is not.
pub fn choose_profile(
    requested: Option<UpdateTarget>,
    enabled: &[PlatformProfile],
) -> Result<ProfileChoice, DispatchError> {
    if enabled.is_empty() {
        return Err(DispatchError::NoProfile);
    }
    if let Some(target) = requested {
        let profile = target.profile();
        if !enabled.contains(&profile) {
            return Err(DispatchError::ProfileDisabled {
                profile: profile.name().to_string(),
                enabled: enabled
                    .iter()
                    .map(|p| p.name())
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }
        return Ok(ProfileChoice::Resolved(profile));
    }
    match enabled {
        [only] => Ok(ProfileChoice::Resolved(*only)),
        _ => Ok(ProfileChoice::NeedsArchitecture),
    }
}

/// Map a sniffed machine string onto a profile: 64-bit ARM is the Pi,
/// anything else is AMD.
#[must_use]
pub fn profile_for_architecture(machine: &str) -> PlatformProfile {
    match Architecture::from_machine(machine) {
        Architecture::Arm64 => PlatformProfile::Rpi4gb,
        Architecture::Amd64 => PlatformProfile::Amd2gb,
    }
}
