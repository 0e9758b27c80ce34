// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page model — one scanned page: its original photo, corner quad, and the
// cropped image derived from them.

use std::path::{Path, PathBuf};

use docscan_core::error::{Result, ScanError};
use docscan_core::types::{PageId, Point, Quad, RotationDirection};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::corners::{CornerDetector, detect_or_fallback, fallback_quad};
use crate::image::Imaging;
use crate::store::{ScratchDir, ScratchKind, remove_file_best_effort};

/// One scanned page.
///
/// `corners` are always in original-photo pixel space. A page is returned
/// by value from every operation; the session decides which copy is
/// committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub original_photo_path: PathBuf,
    pub original_width: u32,
    pub original_height: u32,
    pub corners: Quad,
    /// Set once the corners have been applied.
    pub cropped_photo_path: Option<PathBuf>,
}

impl Page {
    /// Build a transient page for a freshly acquired photo.
    ///
    /// Corners come from `detector`, or from the margin-inset fallback quad
    /// when it finds nothing usable.
    #[instrument(skip(detector), fields(path = %photo_path.display()))]
    pub fn from_capture(
        photo_path: &Path,
        width: u32,
        height: u32,
        detector: &dyn CornerDetector,
        fallback_margin: f64,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(ScanError::InvalidGeometry {
                width: width as f64,
                height: height as f64,
            });
        }

        let corners = detect_or_fallback(detector, photo_path, width, height, fallback_margin);
        Ok(Self {
            id: PageId::new(),
            original_photo_path: photo_path.to_path_buf(),
            original_width: width,
            original_height: height,
            corners,
            cropped_photo_path: None,
        })
    }

    pub fn is_cropped(&self) -> bool {
        self.cropped_photo_path.is_some()
    }

    /// Files this page references on disk.
    pub fn owned_files(&self) -> Vec<&Path> {
        let mut files = vec![self.original_photo_path.as_path()];
        if let Some(cropped) = &self.cropped_photo_path {
            files.push(cropped.as_path());
        }
        files
    }

    /// Whether `path` is one of this page's files.
    pub fn references(&self, path: &Path) -> bool {
        self.owned_files().contains(&path)
    }

    /// Replace the corners, clamping every point into the photo bounds.
    ///
    /// Fails with `MalformedCorners` when the clamped quad crosses itself,
    /// runs counter-clockwise, or has coinciding corners.
    pub fn with_corners(&self, corners: Quad) -> Result<Self> {
        let w = self.original_width as f64;
        let h = self.original_height as f64;
        let clamped = corners.map(|p| Point::new(p.x.clamp(0.0, w), p.y.clamp(0.0, h)));
        if !clamped.is_well_formed() {
            debug!(page = %self.id, corners = ?clamped, "malformed corners rejected");
            return Err(ScanError::MalformedCorners);
        }
        let mut page = self.clone();
        page.corners = clamped;
        Ok(page)
    }

    /// Crop the original by the current corners into a fresh scratch file.
    ///
    /// Returns a copy of the page with `cropped_photo_path` pointing at the
    /// new file. Any previous cropped file is left alone; the caller owns its
    /// cleanup.
    #[instrument(skip(self, imaging, store), fields(page = %self.id))]
    pub fn apply_crop(&self, imaging: &dyn Imaging, store: &ScratchDir, quality: u8) -> Result<Self> {
        let pixels = imaging.crop_to_quad(&self.original_photo_path, &self.corners)?;
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(ScanError::CropFailure("crop produced an empty image".into()));
        }

        let dest = store.fresh_path(ScratchKind::Cropped, "jpg");
        if let Err(err) = imaging.encode_and_save(&pixels, quality, &dest) {
            remove_file_best_effort(&dest);
            return Err(err);
        }

        info!(cropped = %dest.display(), "crop applied");
        let mut page = self.clone();
        page.cropped_photo_path = Some(dest);
        Ok(page)
    }

    /// Rotate the original photo a quarter turn, rewriting it in place.
    ///
    /// Width and height swap, corners revert to the fallback quad for the new
    /// orientation, and the cropped path is cleared since it no longer
    /// matches. The page keeps its identity.
    #[instrument(skip(self, imaging), fields(page = %self.id))]
    pub fn rotate90(
        &self,
        imaging: &dyn Imaging,
        direction: RotationDirection,
        fallback_margin: f64,
    ) -> Result<Self> {
        let pixels = imaging.decode(&self.original_photo_path)?;
        let rotated = imaging.rotate_pixels_90(pixels, direction);
        imaging.rewrite_in_place(&rotated, &self.original_photo_path)?;

        // The decoded size wins over whatever the host reported at capture.
        let (width, height) = (rotated.width(), rotated.height());
        if (width, height) != (self.original_height, self.original_width) {
            warn!(
                recorded_w = self.original_width,
                recorded_h = self.original_height,
                "recorded dimensions disagreed with the photo"
            );
        }

        Ok(Self {
            id: self.id,
            original_photo_path: self.original_photo_path.clone(),
            original_width: width,
            original_height: height,
            corners: fallback_quad(width, height, fallback_margin),
            cropped_photo_path: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corners::NoCornerDetection;
    use crate::image::ProcessorImaging;
    use image::{Rgb, RgbImage};

    fn photo(dir: &Path, width: u32, height: u32) -> PathBuf {
        let path = dir.join("IMG_test.png");
        let mut img = RgbImage::from_pixel(width, height, Rgb([250, 250, 250]));
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.save(&path).expect("save photo");
        path
    }

    #[test]
    fn capture_without_detection_uses_fallback() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = photo(dir.path(), 300, 200);
        let page = Page::from_capture(&path, 300, 200, &NoCornerDetection, 40.0).expect("page");
        assert_eq!(page.corners, fallback_quad(300, 200, 40.0));
        assert!(!page.is_cropped());
        assert_eq!(page.owned_files(), vec![path.as_path()]);
    }

    #[test]
    fn zero_sized_capture_is_invalid_geometry() {
        let err = Page::from_capture(Path::new("x.jpg"), 0, 10, &NoCornerDetection, 40.0)
            .err()
            .expect("must fail");
        assert!(matches!(err, ScanError::InvalidGeometry { .. }));
    }

    #[test]
    fn apply_crop_writes_fresh_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ScratchDir::open(dir.path().join("scratch")).expect("store");
        let path = photo(dir.path(), 300, 200);
        let page = Page::from_capture(&path, 300, 200, &NoCornerDetection, 40.0).expect("page");

        let first = page.apply_crop(&ProcessorImaging, &store, 80).expect("crop");
        let second = page.apply_crop(&ProcessorImaging, &store, 80).expect("crop");
        let a = first.cropped_photo_path.clone().expect("cropped");
        let b = second.cropped_photo_path.clone().expect("cropped");
        assert_ne!(a, b);
        assert!(a.exists() && b.exists());
        assert_eq!(first.id, page.id);
        assert_eq!(image::image_dimensions(&a).expect("dims"), (220, 120));
    }

    #[test]
    fn apply_crop_on_missing_original_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ScratchDir::open(dir.path()).expect("store");
        let page = Page::from_capture(
            &dir.path().join("gone.jpg"),
            100,
            100,
            &NoCornerDetection,
            40.0,
        )
        .expect("page");
        let err = page.apply_crop(&ProcessorImaging, &store, 80).err().expect("must fail");
        assert!(matches!(err, ScanError::CropFailure(_)));
        assert_eq!(std::fs::read_dir(dir.path()).expect("ls").count(), 0);
    }

    #[test]
    fn rotate_swaps_dimensions_and_rewrites_in_place() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = photo(dir.path(), 300, 200);
        let page = Page::from_capture(&path, 300, 200, &NoCornerDetection, 40.0)
            .expect("page")
            .with_corners(Quad::new(
                Point::new(5.0, 5.0),
                Point::new(295.0, 5.0),
                Point::new(295.0, 195.0),
                Point::new(5.0, 195.0),
            ))
            .expect("corners");

        let rotated = page
            .rotate90(&ProcessorImaging, RotationDirection::Clockwise, 40.0)
            .expect("rotate");
        assert_eq!((rotated.original_width, rotated.original_height), (200, 300));
        assert_eq!(rotated.corners, fallback_quad(200, 300, 40.0));
        assert_eq!(rotated.original_photo_path, path);
        assert_eq!(rotated.id, page.id);
        assert_eq!(image::image_dimensions(&path).expect("dims"), (200, 300));
        assert_eq!(std::fs::read_dir(dir.path()).expect("ls").count(), 1);
    }

    #[test]
    fn corners_are_clamped_into_photo() {
        let page = Page::from_capture(Path::new("p.jpg"), 100, 50, &NoCornerDetection, 10.0)
            .expect("page")
            .with_corners(Quad::new(
                Point::new(-3.0, -1.0),
                Point::new(130.0, 0.0),
                Point::new(100.0, 70.0),
                Point::new(0.0, 50.0),
            ))
            .expect("corners");
        assert!(page.corners.fits_within(100.0, 50.0));
        assert_eq!(page.corners.top_left, Point::new(0.0, 0.0));
    }

    #[test]
    fn crossed_or_collapsed_corners_are_rejected() {
        let page = Page::from_capture(Path::new("p.jpg"), 400, 300, &NoCornerDetection, 40.0)
            .expect("page");
        let bow_tie = Quad::new(
            Point::new(40.0, 40.0),
            Point::new(360.0, 260.0),
            Point::new(360.0, 40.0),
            Point::new(40.0, 260.0),
        );
        let dot = Point::new(200.0, 150.0);
        for corners in [bow_tie, Quad::new(dot, dot, dot, dot)] {
            assert!(matches!(
                page.with_corners(corners),
                Err(ScanError::MalformedCorners)
            ));
        }
        // Dragging two corners past the same edge collapses them after clamping.
        let squashed = Quad::new(
            Point::new(-50.0, -50.0),
            Point::new(-10.0, -80.0),
            Point::new(360.0, 260.0),
            Point::new(40.0, 260.0),
        );
        assert!(page.with_corners(squashed).is_err());
    }

    #[test]
    fn rotate_trusts_decoded_size_over_recorded_size() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = photo(dir.path(), 300, 200);
        // Host reported the pre-EXIF orientation.
        let page = Page::from_capture(&path, 200, 300, &NoCornerDetection, 40.0).expect("page");

        let rotated = page
            .rotate90(&ProcessorImaging, RotationDirection::Clockwise, 40.0)
            .expect("rotate");
        assert_eq!((rotated.original_width, rotated.original_height), (200, 300));
        assert_eq!(rotated.corners, fallback_quad(200, 300, 40.0));
        assert!(rotated.corners.fits_within(200.0, 300.0));
    }
}
