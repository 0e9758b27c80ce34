// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub bridge for desktop/CI builds where native mobile APIs are unavailable.
//
// Camera and picker return `PlatformUnavailable`; MIME lookup falls back to
// the extension-based default.

use docscan_core::error::{Result, ScanError};

use crate::traits::*;

/// No-op bridge returned on non-mobile platforms.
pub struct StubBridge;

impl ScannerBridge for StubBridge {
    fn platform_name(&self) -> &str {
        "Desktop (stub)"
    }
}

impl NativeCamera for StubBridge {
    fn capture_photo(&self) -> Result<Option<CapturedPhoto>> {
        tracing::warn!("NativeCamera::capture_photo called on stub bridge");
        Err(ScanError::PlatformUnavailable)
    }
}

impl NativeFilePicker for StubBridge {
    fn pick_document(&self, _mime_types: &[&str]) -> Result<Option<PickedFile>> {
        tracing::warn!("NativeFilePicker::pick_document called on stub bridge");
        Err(ScanError::PlatformUnavailable)
    }
}

impl NativeMimeTypes for StubBridge {}
