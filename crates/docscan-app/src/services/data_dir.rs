// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware directory and configuration resolution.

use std::path::{Path, PathBuf};

use docscan_core::config::ScanConfig;
use docscan_core::error::Result;
use tracing::info;

/// Environment variable naming a JSON file with `ScanConfig` overrides.
pub const CONFIG_ENV: &str = "DOCSCAN_CONFIG";

/// Directory for scratch page files.
///
/// On desktop this uses the XDG cache location. On mobile the host passes
/// its own cache directory in the config instead.
pub fn scratch_dir() -> PathBuf {
    cache_base().join("docscan")
}

fn cache_base() -> PathBuf {
    // Try XDG cache dir, then fallback to home
    if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
        return PathBuf::from(xdg);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".cache");
    }
    // Last resort
    std::env::temp_dir()
}

/// Base configuration for every session this process runs.
///
/// Reads the file named by `DOCSCAN_CONFIG` when set; the scratch directory
/// defaults to [`scratch_dir`] when the file does not name one.
pub fn load_config() -> Result<ScanConfig> {
    let mut config = match std::env::var(CONFIG_ENV) {
        Ok(path) => read_config(Path::new(&path))?,
        Err(_) => ScanConfig::default(),
    };
    if config.scratch_dir.is_none() {
        config.scratch_dir = Some(scratch_dir());
    }
    config.validate()?;
    Ok(config)
}

fn read_config(path: &Path) -> Result<ScanConfig> {
    let text = std::fs::read_to_string(path)?;
    let config: ScanConfig = serde_json::from_str(&text)?;
    info!(path = %path.display(), "configuration loaded");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_file_uses_host_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("docscan.json");
        std::fs::write(&path, r#"{"croppedImageQuality": 65, "maxNumDocuments": 8}"#)
            .expect("write");
        let config = read_config(&path).expect("read");
        assert_eq!(config.cropped_image_quality, 65);
        assert_eq!(config.max_num_documents, 8);
        assert_eq!(config.corner_fallback_margin, 40.0);
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("docscan.json");
        std::fs::write(&path, "{not json").expect("write");
        assert!(read_config(&path).is_err());
    }
}
