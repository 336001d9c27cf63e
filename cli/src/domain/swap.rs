//! Swap capacity parsing and config-file rewriting.
//!
//! Pure text transforms over `/proc/meminfo`, the boot-time mount table, and
//! the swap-size manager's config file.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

/// Config key holding the swap-size manager's configured size in MiB.
pub const SWAP_SIZE_KEY: &str = "CONF_SWAPSIZE";

#[allow(clippy::expect_used)] // Pattern is a compile-time constant
static SWAP_SIZE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^CONF_SWAPSIZE=.*$").expect("valid regex"));

/// Extract `SwapTotal` (KiB) from `/proc/meminfo` contents.
#[must_use]
pub fn parse_swap_total_kib(meminfo: &str) -> Option<u64> {
    meminfo.lines().find_map(|line| {
        let rest = line.strip_prefix("SwapTotal:")?;
        rest.split_whitespace().next()?.parse().ok()
    })
}

/// Whether the `rpi4gb` threshold demands a resize. Equal is sufficient.
#[must_use]
pub fn below_threshold(swap_total_kib: u64, threshold_kib: u64) -> bool {
    swap_total_kib < threshold_kib
}

/// Mount-table line that activates `swap_file` at boot.
#[must_use]
pub fn mount_entry(swap_file: &Path) -> String {
    format!("{} none swap sw 0 0", swap_file.display())
}

/// Whether the mount table already activates `swap_file` as swap.
#[must_use]
pub fn has_mount_entry(mount_table: &str, swap_file: &Path) -> bool {
    let wanted = swap_file.to_string_lossy();
    mount_table
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#'))
        .any(|line| {
            let mut fields = line.split_whitespace();
            fields.next() == Some(wanted.as_ref()) && fields.nth(1) == Some("swap")
        })
}

/// Rewrite every active `CONF_SWAPSIZE=` line to `size_mib`, or append one
/// when the key is absent or only present as a comment.
#[must_use]
pub fn set_swap_size(config: &str, size_mib: u64) -> String {
    let line = format!("{SWAP_SIZE_KEY}={size_mib}");
    if SWAP_SIZE_LINE.is_match(config) {
        return SWAP_SIZE_LINE.replace_all(config, line.as_str()).into_owned();
    }
    let mut out = config.to_string();
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&line);
    out.push('\n');
    out
}

/// Timestamped backup path for the swap-size manager's config, e.g.
/// `/etc/dphys-swapfile.bak.20260101120000`.
#[must_use]
pub fn backup_path(config: &Path, stamp: &str) -> PathBuf {
    let mut name = config.as_os_str().to_owned();
    name.push(format!(".bak.{stamp}"));
    PathBuf::from(name)
}
