// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scratch directory for original and cropped page files.
//
// Every file gets a timestamp plus a random suffix, so a stale background
// crop can never overwrite the file of a fresh one for the same page slot.

use std::path::{Path, PathBuf};

use docscan_core::error::Result;
use tracing::{debug, warn};
use uuid::Uuid;

/// Subdirectory of the system temp dir used when no scratch dir is configured.
const DEFAULT_SUBDIR: &str = "docscan";

/// Kind of page file, used as the file name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScratchKind {
    Original,
    Cropped,
}

impl ScratchKind {
    fn prefix(&self) -> &'static str {
        match self {
            Self::Original => "IMG",
            Self::Cropped => "CROP",
        }
    }
}

/// Directory that owns the scanner's temporary page files.
#[derive(Debug, Clone)]
pub struct ScratchDir {
    root: PathBuf,
}

impl ScratchDir {
    /// Use `root`, creating it if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        debug!(path = %root.display(), "scratch directory ready");
        Ok(Self { root })
    }

    /// Use the configured directory, or `<system temp>/docscan`.
    pub fn from_config(dir: Option<&Path>) -> Result<Self> {
        match dir {
            Some(dir) => Self::open(dir),
            None => Self::open(std::env::temp_dir().join(DEFAULT_SUBDIR)),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// A fresh, unused file path with the given extension.
    pub fn fresh_path(&self, kind: ScratchKind, extension: &str) -> PathBuf {
        let stamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
        let unique = Uuid::new_v4().simple().to_string();
        self.root
            .join(format!("{}_{stamp}_{}.{extension}", kind.prefix(), &unique[..12]))
    }

    /// Copy `source` into a fresh file, keeping its extension.
    pub fn copy_to_fresh(&self, source: &Path, kind: ScratchKind) -> Result<PathBuf> {
        let extension = source
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("jpg");
        let dest = self.fresh_path(kind, extension);
        std::fs::copy(source, &dest)?;
        debug!(from = %source.display(), to = %dest.display(), "scratch copy created");
        Ok(dest)
    }
}

/// Delete `path`, logging instead of failing.
///
/// A dangling temp file never blocks the scan flow. Returns whether the file
/// is gone afterwards.
pub fn remove_file_best_effort(path: &Path) -> bool {
    match std::fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "file deleted");
            true
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => true,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to delete file");
            false
        }
    }
}
