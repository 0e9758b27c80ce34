// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Desktop bridge — native file dialogs stand in for the camera and the
// document picker.
//
// The "camera" asks for a photo and copies it into the scratch dir, because
// camera photos are owned by the scanner and deleted when the session ends.

use std::path::PathBuf;

use docscan_bridge::{
    CapturedPhoto, NativeCamera, NativeFilePicker, NativeMimeTypes, PickedFile, ScannerBridge,
};
use docscan_core::error::Result;
use docscan_document::store::ScratchKind;
use docscan_document::{Imaging, ProcessorImaging, ScratchDir};
use tracing::{debug, info};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "tiff", "tif", "bmp"];

/// Bridge backed by `rfd` file dialogs.
pub struct DesktopBridge {
    store: ScratchDir,
}

impl DesktopBridge {
    pub fn new(store: ScratchDir) -> Self {
        Self { store }
    }
}

/// Dialog filters `(label, extensions)` for a list of accepted MIME types.
///
/// Wildcard and exact image types both map to the raster extensions; unknown
/// types are skipped.
pub fn dialog_filters(mime_types: &[&str]) -> Vec<(&'static str, Vec<&'static str>)> {
    let mut filters: Vec<(&'static str, Vec<&'static str>)> = Vec::new();
    for mime in mime_types {
        let filter = if mime.starts_with("image/") {
            ("Images", IMAGE_EXTENSIONS.to_vec())
        } else if *mime == "application/pdf" {
            ("PDF documents", vec!["pdf"])
        } else {
            continue;
        };
        if !filters.iter().any(|(label, _)| *label == filter.0) {
            filters.push(filter);
        }
    }
    filters
}

fn pick_file(title: &str, mime_types: &[&str]) -> Option<PathBuf> {
    let mut dialog = rfd::FileDialog::new().set_title(title);
    for (label, extensions) in dialog_filters(mime_types) {
        dialog = dialog.add_filter(label, extensions.as_slice());
    }
    dialog.pick_file()
}

impl ScannerBridge for DesktopBridge {
    fn platform_name(&self) -> &str {
        "Desktop"
    }
}

impl NativeCamera for DesktopBridge {
    fn capture_photo(&self) -> Result<Option<CapturedPhoto>> {
        let Some(source) = pick_file("Choose a photo of the page", &["image/*"]) else {
            debug!("photo dialog dismissed");
            return Ok(None);
        };
        let path = self.store.copy_to_fresh(&source, ScratchKind::Original)?;
        let (width, height) = match ProcessorImaging.dimensions(&path) {
            Ok(dimensions) => dimensions,
            Err(err) => {
                docscan_document::store::remove_file_best_effort(&path);
                return Err(err);
            }
        };
        info!(path = %source.display(), width, height, "photo loaded for scanning");
        Ok(Some(CapturedPhoto {
            path,
            width,
            height,
        }))
    }
}

impl NativeFilePicker for DesktopBridge {
    fn pick_document(&self, mime_types: &[&str]) -> Result<Option<PickedFile>> {
        let picked = pick_file("Select a document", mime_types).map(|path| PickedFile {
            path,
            mime_type: None,
        });
        if picked.is_none() {
            debug!("document dialog dismissed");
        }
        Ok(picked)
    }
}

impl NativeMimeTypes for DesktopBridge {}
