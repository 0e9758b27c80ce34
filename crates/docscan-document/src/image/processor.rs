// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — quarter-turn rotation, quad crop, and JPEG output for a
// single page photo. Operates on in-memory images using the `image` and
// `imageproc` crates.

use std::path::Path;

use docscan_core::error::{Result, ScanError};
use docscan_core::types::{Quad, RotationDirection};
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use tracing::{debug, info, instrument};

/// Image pipeline operating on a single in-memory page photo.
///
/// Transformations consume `self` and return a new `ImageProcessor`, so
/// calls chain:
///
/// ```ignore
/// let bytes = ImageProcessor::open("page.jpg")?
///     .rotate_quarter(RotationDirection::Clockwise)
///     .crop_to_quad(&corners)?
///     .to_jpeg_bytes(80)?;
/// ```
pub struct ImageProcessor {
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let img = image::open(path.as_ref()).map_err(|err| {
            ScanError::CropFailure(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        debug!(width = img.width(), height = img.height(), "Image loaded");
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Transformations ------------------------------------------------------

    /// Lossless quarter turn.
    pub fn rotate_quarter(self, direction: RotationDirection) -> Self {
        let image = match direction {
            RotationDirection::Clockwise => self.image.rotate90(),
            RotationDirection::CounterClockwise => self.image.rotate270(),
        };
        Self { image }
    }

    /// Warp the region inside `quad` (original-photo coordinates) onto an
    /// upright rectangle.
    ///
    /// The output size is the longer of each pair of opposite edges. Fails
    /// with `CropFailure` when that size rounds to zero or the quad admits no
    /// projective mapping.
    #[instrument(skip(self), fields(src_w = self.image.width(), src_h = self.image.height()))]
    pub fn crop_to_quad(self, quad: &Quad) -> Result<Self> {
        let top = quad.top_left.distance_to(quad.top_right);
        let bottom = quad.bottom_left.distance_to(quad.bottom_right);
        let left = quad.top_left.distance_to(quad.bottom_left);
        let right = quad.top_right.distance_to(quad.bottom_right);

        let out_w = top.max(bottom).round() as u32;
        let out_h = left.max(right).round() as u32;
        if out_w == 0 || out_h == 0 {
            return Err(ScanError::CropFailure(format!(
                "crop produced an empty {out_w}x{out_h} image"
            )));
        }

        let src: [(f32, f32); 4] = [
            (quad.top_left.x as f32, quad.top_left.y as f32),
            (quad.top_right.x as f32, quad.top_right.y as f32),
            (quad.bottom_right.x as f32, quad.bottom_right.y as f32),
            (quad.bottom_left.x as f32, quad.bottom_left.y as f32),
        ];
        let dest: [(f32, f32); 4] = [
            (0.0, 0.0),
            (out_w as f32, 0.0),
            (out_w as f32, out_h as f32),
            (0.0, out_h as f32),
        ];

        let projection = Projection::from_control_points(src, dest).ok_or_else(|| {
            ScanError::CropFailure("corners do not describe a valid quadrilateral".into())
        })?;

        let rgba_input = self.image.to_rgba8();
        let default_pixel = Rgba([255u8, 255, 255, 255]);
        let mut output = RgbaImage::new(out_w, out_h);
        warp_into(
            &rgba_input,
            &projection,
            Interpolation::Bilinear,
            default_pixel,
            &mut output,
        );

        info!(out_w, out_h, "Quad crop applied");
        Ok(Self {
            image: DynamicImage::ImageRgba8(output),
        })
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image as JPEG bytes.
    ///
    /// `quality` is clamped to 1-100; 0 is treated as the lowest quality.
    pub fn to_jpeg_bytes(&self, quality: u8) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let rgb = self.image.to_rgb8();
        let encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
        rgb.write_with_encoder(encoder).map_err(|err| {
            ScanError::CropFailure(format!("JPEG encoding failed: {}", err))
        })?;
        Ok(buffer)
    }

    /// Write the image as JPEG to `path`, replacing any existing file.
    pub fn save_jpeg(&self, path: impl AsRef<Path>, quality: u8) -> Result<()> {
        let bytes = self.to_jpeg_bytes(quality)?;
        std::fs::write(path.as_ref(), bytes)?;
        debug!(path = %path.as_ref().display(), "JPEG written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docscan_core::types::Point;
    use image::{GrayImage, Luma};

    fn gray(width: u32, height: u32) -> ImageProcessor {
        ImageProcessor::from_dynamic(DynamicImage::ImageLuma8(GrayImage::from_pixel(
            width,
            height,
            Luma([200u8]),
        )))
    }

    #[test]
    fn quarter_turn_swaps_dimensions() {
        let rotated = gray(40, 70).rotate_quarter(RotationDirection::Clockwise);
        assert_eq!((rotated.width(), rotated.height()), (70, 40));
        let back = rotated.rotate_quarter(RotationDirection::CounterClockwise);
        assert_eq!((back.width(), back.height()), (40, 70));
    }

    #[test]
    fn crop_uses_longest_edges() {
        let quad = Quad::new(
            Point::new(10.0, 10.0),
            Point::new(110.0, 10.0),
            Point::new(110.0, 60.0),
            Point::new(10.0, 60.0),
        );
        let cropped = gray(200, 100).crop_to_quad(&quad).expect("crop");
        assert_eq!((cropped.width(), cropped.height()), (100, 50));
    }

    #[test]
    fn collapsed_quad_is_a_crop_failure() {
        let p = Point::new(5.0, 5.0);
        let err = gray(20, 20)
            .crop_to_quad(&Quad::new(p, p, p, p))
            .err()
            .expect("must fail");
        assert!(matches!(err, ScanError::CropFailure(_)));
    }

    #[test]
    fn jpeg_output_decodes() {
        let bytes = gray(16, 8).to_jpeg_bytes(0).expect("encode");
        let decoded = image::load_from_memory(&bytes).expect("decode");
        assert_eq!((decoded.width(), decoded.height()), (16, 8));
    }

    #[test]
    fn open_missing_file_is_crop_failure() {
        let err = ImageProcessor::open("/definitely/not/here.jpg")
            .err()
            .expect("must fail");
        assert!(matches!(err, ScanError::CropFailure(_)));
    }
}
