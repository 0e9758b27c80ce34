// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for the scanner's native capabilities.

use std::path::{Path, PathBuf};

use docscan_core::error::Result;
use docscan_core::types::DocumentType;
use serde::{Deserialize, Serialize};

/// MIME filter the picker is opened with: any image, or a PDF to pass through.
pub const PICKER_MIME_TYPES: &[&str] = &["image/*", "application/pdf"];

/// Everything the scanner needs from the host platform.
///
/// Platforms that lack a capability (no camera on a desktop) return
/// `ScanError::PlatformUnavailable` from it.
pub trait ScannerBridge: NativeCamera + NativeFilePicker + NativeMimeTypes + Send + Sync {
    /// Human-readable platform name (e.g. "iOS 17", "Android 14").
    fn platform_name(&self) -> &str;
}

/// A photo the camera wrote to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedPhoto {
    /// Scratch file now owned by the scanner.
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// A file the user chose in the picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickedFile {
    /// The user's file. The scanner copies it before modifying anything.
    pub path: PathBuf,
    /// MIME type reported by the picker, when it reports one.
    pub mime_type: Option<String>,
}

/// Capture photos with the device camera.
pub trait NativeCamera {
    /// Launch the system camera and save the photo.
    /// Returns Ok(None) if the user cancelled.
    fn capture_photo(&self) -> Result<Option<CapturedPhoto>>;
}

/// Pick files from the device storage or gallery.
pub trait NativeFilePicker {
    /// Show a picker filtered to the given MIME types.
    /// Returns the chosen file, or None if cancelled.
    fn pick_document(&self, mime_types: &[&str]) -> Result<Option<PickedFile>>;
}

/// Content-type lookup for files the platform hands over.
pub trait NativeMimeTypes {
    /// MIME type of the file at `path`, if the platform can tell.
    ///
    /// The default looks at the extension only.
    fn mime_type_of(&self, path: &Path) -> Option<String> {
        DocumentType::from_path(path).map(|doc| doc.mime_type().to_string())
    }
}
