// src/probe.rs

//! Runtime-environment discovery.
//!
//! Asks the toolchain which runtimes are installed and records their
//! install directories into the settings document, leaving every other
//! key alone. Listing lines look like:
//!
//! ```text
//! Microsoft.NETCore.App 6.0.4 [/usr/share/dotnet/shared/Microsoft.NETCore.App]
//! ```
//!
//! Band selection is "last entry wins" in the order the toolchain lists
//! them. That is an ordering contract with the external tool, not a
//! semantic-version comparison.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::errors::Result;
use crate::proc::ProcessRunner;
use crate::settings::SettingsFile;

/// Runtime family the probe cares about; other listed runtimes
/// (AspNetCore, WindowsDesktop, ...) are ignored.
pub const RUNTIME_FAMILY: &str = "Microsoft.NETCore.App";

/// Version-band prefixes and the settings key each one feeds.
pub const VERSION_BANDS: &[(&str, &str)] =
    &[("5.0.", "DotNetCoreDirPathNet5"), ("6.0.", "DotNetCoreDirPathNet6")];

/// Settings key receiving the last listed runtime, whatever its band.
pub const LATEST_KEY: &str = "DotNetCoreDirPathDefault";

/// One parsed listing entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeEntry {
    pub version: String,
    pub path: PathBuf,
}

impl RuntimeEntry {
    /// Full install directory for this exact version.
    pub fn install_dir(&self) -> PathBuf {
        self.path.join(&self.version)
    }
}

/// Parse the `--list-runtimes` output, keeping only well-formed entries
/// of the target family. Malformed lines are dropped, not errors: hosts
/// report all sorts of extra runtimes and formats.
pub fn parse_runtime_listing(lines: &[String]) -> Vec<RuntimeEntry> {
    lines
        .iter()
        .filter(|line| line.starts_with(RUNTIME_FAMILY))
        .filter_map(|line| parse_line(line))
        .collect()
}

fn parse_line(line: &str) -> Option<RuntimeEntry> {
    let mut fields = line.split_whitespace();
    let _name = fields.next()?;
    let version = fields.next()?.to_string();
    if version.starts_with('[') {
        return None;
    }

    // The install path is the final bracketed field; it may itself
    // contain spaces, so slice the raw line rather than the fields.
    let open = line.find('[')?;
    let close = line.rfind(']')?;
    if close <= open {
        return None;
    }
    let path = &line[open + 1..close];
    if path.is_empty() {
        return None;
    }

    Some(RuntimeEntry {
        version,
        path: PathBuf::from(path),
    })
}

/// Last entry whose version starts with `prefix`, if any.
pub fn select_band<'a>(entries: &'a [RuntimeEntry], prefix: &str) -> Option<&'a RuntimeEntry> {
    entries.iter().rev().find(|e| e.version.starts_with(prefix))
}

/// Run the probe: list runtimes, select bands, and write their install
/// directories into `settings`. Bands with no installed runtime leave
/// their key untouched. The caller persists the document.
pub fn record_runtime_paths(
    runner: &dyn ProcessRunner,
    settings: &mut SettingsFile,
) -> Result<()> {
    let lines = runner.run("dotnet", &["--list-runtimes"])?;
    let entries = parse_runtime_listing(&lines);
    debug!(count = entries.len(), "parsed runtime listing");

    for &(prefix, key) in VERSION_BANDS {
        if let Some(entry) = select_band(&entries, prefix) {
            let dir = entry.install_dir();
            info!(key, version = %entry.version, path = %dir.display(), "recording runtime path");
            settings.set(key, dir.display().to_string());
        }
    }

    if let Some(entry) = entries.last() {
        let dir = entry.install_dir();
        info!(key = LATEST_KEY, version = %entry.version, path = %dir.display(), "recording latest runtime path");
        settings.set(LATEST_KEY, dir.display().to_string());
    }

    Ok(())
}
