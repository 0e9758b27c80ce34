// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Imaging capability used by pages: decode, quad crop, encode, and rotation.
//
// Codec failures of any kind surface as `ScanError::CropFailure`.

use std::path::Path;

use docscan_core::error::{Result, ScanError};
use docscan_core::types::{Quad, RotationDirection};
use image::DynamicImage;
use tracing::instrument;

use super::processor::ImageProcessor;

/// Pixel-level operations on page photos.
///
/// The session only ever talks to this trait, so hosts with a native codec
/// (or tests with a failing one) can swap the implementation.
pub trait Imaging: Send + Sync {
    /// Pixel dimensions of the image at `path` without decoding it fully.
    fn dimensions(&self, path: &Path) -> Result<(u32, u32)>;

    /// Decode the image at `path`.
    fn decode(&self, path: &Path) -> Result<DynamicImage>;

    /// Warp the region inside `quad` onto an upright rectangle.
    fn crop_to_quad(&self, path: &Path, quad: &Quad) -> Result<DynamicImage>;

    /// Encode `pixels` as JPEG at `quality` (0-100) and write them to `dest`.
    fn encode_and_save(&self, pixels: &DynamicImage, quality: u8, dest: &Path) -> Result<()>;

    /// Quarter-turn the pixel buffer.
    fn rotate_pixels_90(&self, pixels: DynamicImage, direction: RotationDirection) -> DynamicImage;

    /// Overwrite the file at `path` with `pixels`, keeping the format its
    /// extension names.
    fn rewrite_in_place(&self, pixels: &DynamicImage, path: &Path) -> Result<()>;
}

/// Default imaging on top of the `image` and `imageproc` crates.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessorImaging;

impl Imaging for ProcessorImaging {
    fn dimensions(&self, path: &Path) -> Result<(u32, u32)> {
        image::image_dimensions(path).map_err(|err| {
            ScanError::CropFailure(format!("failed to read size of {}: {}", path.display(), err))
        })
    }

    fn decode(&self, path: &Path) -> Result<DynamicImage> {
        Ok(ImageProcessor::open(path)?.into_dynamic())
    }

    #[instrument(skip_all, fields(path = %path.display()))]
    fn crop_to_quad(&self, path: &Path, quad: &Quad) -> Result<DynamicImage> {
        Ok(ImageProcessor::open(path)?.crop_to_quad(quad)?.into_dynamic())
    }

    fn encode_and_save(&self, pixels: &DynamicImage, quality: u8, dest: &Path) -> Result<()> {
        ImageProcessor::from_dynamic(pixels.clone()).save_jpeg(dest, quality)
    }

    fn rotate_pixels_90(&self, pixels: DynamicImage, direction: RotationDirection) -> DynamicImage {
        ImageProcessor::from_dynamic(pixels)
            .rotate_quarter(direction)
            .into_dynamic()
    }

    #[instrument(skip_all, fields(path = %path.display()))]
    fn rewrite_in_place(&self, pixels: &DynamicImage, path: &Path) -> Result<()> {
        let is_jpeg = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "jpg" | "jpeg"))
            .unwrap_or(false);
        if is_jpeg {
            // JPEG has no alpha channel; go through the processor's RGB path.
            return ImageProcessor::from_dynamic(pixels.clone()).save_jpeg(path, 95);
        }
        pixels.save(path).map_err(|err| {
            ScanError::CropFailure(format!("failed to rewrite {}: {}", path.display(), err))
        })
    }
}
