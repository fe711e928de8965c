// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware data directory resolution.

use std::path::PathBuf;

use docrename_core::config::CONFIG_FILE;

/// Return the application data directory. Not created here; saving the
/// config creates it on demand.
pub fn data_dir() -> PathBuf {
    dirs_fallback().join("docrename")
}

/// The config file to use: an explicit `--config` path, or `docrename.json`
/// in the data directory.
pub fn config_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| data_dir().join(CONFIG_FILE))
}

fn dirs_fallback() -> PathBuf {
    // Try XDG data dir, then APPDATA (Windows), then fall back to home
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(xdg);
    }
    if let Ok(appdata) = std::env::var("APPDATA") {
        return PathBuf::from(appdata);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".local").join("share");
    }
    // Last resort: next to wherever we were started
    PathBuf::from(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        let explicit = PathBuf::from("/etc/docrename/custom.json");
        assert_eq!(config_path(Some(explicit.clone())), explicit);
    }

    #[test]
    fn default_lives_in_data_dir() {
        let path = config_path(None);
        assert!(path.ends_with("docrename/docrename.json"));
    }
}
