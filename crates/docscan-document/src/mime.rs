// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Content-type detection for picked and shared files.

use std::io::Read;
use std::path::Path;

use docscan_core::error::Result;
use docscan_core::types::DocumentType;
use image::ImageFormat;
use tracing::debug;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Work out what kind of file `path` is.
///
/// The extension decides when it is a known one. Otherwise the first bytes
/// are sniffed: a PDF header, then any raster format the `image` crate
/// recognises. Anything left over is an opaque document.
pub fn detect_document_type(path: &Path) -> Result<DocumentType> {
    if let Some(doc) = DocumentType::from_path(path) {
        return Ok(doc);
    }

    let mut head = [0u8; 5];
    let mut file = std::fs::File::open(path)?;
    let read = file.read(&mut head)?;
    if &head[..read] == PDF_MAGIC {
        debug!(path = %path.display(), "sniffed PDF header");
        return Ok(DocumentType::Pdf);
    }

    let format = image::ImageReader::open(path)?
        .with_guessed_format()?
        .format();
    let doc = match format {
        Some(ImageFormat::Jpeg) => DocumentType::Jpeg,
        Some(ImageFormat::Png) => DocumentType::Png,
        Some(ImageFormat::WebP) => DocumentType::Webp,
        Some(ImageFormat::Tiff) => DocumentType::Tiff,
        Some(ImageFormat::Bmp) => DocumentType::Bmp,
        _ => DocumentType::OtherDocument,
    };
    debug!(path = %path.display(), ?doc, "sniffed content type");
    Ok(doc)
}
