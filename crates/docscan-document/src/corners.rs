// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Corner detection seam and the margin-inset fallback quad used when no
// document boundary is found.

use std::path::Path;

use docscan_core::types::{Point, Quad};
use tracing::debug;

/// Finds the document quadrilateral in a photo.
///
/// Implementations return corners in original-photo pixel space, or `None`
/// when no document boundary could be found.
pub trait CornerDetector: Send + Sync {
    fn detect_corners(&self, photo_path: &Path, width: u32, height: u32) -> Option<Quad>;
}

/// Detector that never finds anything, so every page starts from the
/// fallback quad.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCornerDetection;

impl CornerDetector for NoCornerDetection {
    fn detect_corners(&self, _photo_path: &Path, _width: u32, _height: u32) -> Option<Quad> {
        None
    }
}

/// Margin actually applied along one axis.
///
/// The configured margin is kept while it leaves room between the two
/// opposite corners; on a dimension of `2 * margin` or less it shrinks to a
/// quarter of the dimension so the quad keeps the middle half of that axis.
fn axis_margin(dimension: f64, margin: f64) -> f64 {
    if dimension > 2.0 * margin {
        margin
    } else {
        dimension / 4.0
    }
}

/// Quad inset from the photo's corners by `margin` in each axis.
pub fn fallback_quad(width: u32, height: u32, margin: f64) -> Quad {
    let w = width as f64;
    let h = height as f64;
    let mx = axis_margin(w, margin);
    let my = axis_margin(h, margin);
    if mx != margin || my != margin {
        debug!(width, height, margin, mx, my, "fallback margin reduced for small photo");
    }

    Quad::new(
        Point::new(0.0, 0.0).translate(mx, my),
        Point::new(w, 0.0).translate(-mx, my),
        Point::new(w, h).translate(-mx, -my),
        Point::new(0.0, h).translate(mx, -my),
    )
}

/// Detect corners, falling back to the margin-inset quad.
///
/// A detected quad that is malformed or leaves the photo bounds is treated
/// as no detection.
pub fn detect_or_fallback(
    detector: &dyn CornerDetector,
    photo_path: &Path,
    width: u32,
    height: u32,
    margin: f64,
) -> Quad {
    match detector.detect_corners(photo_path, width, height) {
        Some(quad) if quad.is_well_formed() && quad.fits_within(width as f64, height as f64) => quad,
        Some(quad) => {
            debug!(?quad, "detected corners rejected; using fallback quad");
            fallback_quad(width, height, margin)
        }
        None => fallback_quad(width, height, margin),
    }
}
