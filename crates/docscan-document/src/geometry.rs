// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Preview geometry — mapping corner quads between original-photo pixel space
// and the scaled, letterboxed preview shown in the crop editor.

use docscan_core::error::{Result, ScanError};
use docscan_core::types::{Point, Quad, Rect};

/// Scale factor from original-photo space to a preview of the given bounds.
///
/// The fit is height-anchored: `bounds.height / original_height`. Fails with
/// `InvalidGeometry` when the photo height is not positive.
pub fn preview_scale(bounds: &Rect, original_height: f64) -> Result<f64> {
    if !(original_height > 0.0) || !original_height.is_finite() {
        return Err(ScanError::InvalidGeometry {
            width: bounds.width,
            height: original_height,
        });
    }
    let scale = bounds.height / original_height;
    if !(scale > 0.0) || !scale.is_finite() {
        return Err(ScanError::InvalidGeometry {
            width: bounds.width,
            height: bounds.height,
        });
    }
    Ok(scale)
}

/// Place an image of `image_width` x `image_height` inside a container,
/// preserving aspect ratio and centring the blank space.
///
/// The image fills the container height unless that would overflow the
/// width, in which case it is width-limited and centred vertically.
pub fn fit_preview_bounds(
    image_width: f64,
    image_height: f64,
    container_width: f64,
    container_height: f64,
) -> Result<Rect> {
    if !(image_width > 0.0) || !(image_height > 0.0) {
        return Err(ScanError::InvalidGeometry {
            width: image_width,
            height: image_height,
        });
    }
    if !(container_width > 0.0) || !(container_height > 0.0) {
        return Err(ScanError::InvalidGeometry {
            width: container_width,
            height: container_height,
        });
    }

    let height_fit_width = image_width * container_height / image_height;
    let (width, height) = if height_fit_width <= container_width {
        (height_fit_width, container_height)
    } else {
        (container_width, image_height * container_width / image_width)
    };

    Ok(Rect::new(
        (container_width - width) / 2.0,
        (container_height - height) / 2.0,
        width,
        height,
    ))
}

/// Map a quad from original-photo space into preview space.
pub fn to_preview(quad: &Quad, bounds: &Rect, scale: f64) -> Quad {
    quad.map(|p| Point::new(p.x * scale + bounds.left, p.y * scale + bounds.top))
}

/// Map a quad from preview space back into original-photo space.
///
/// Inverse of [`to_preview`] for the same `bounds` and `scale`. `scale` must
/// be positive; obtain it from [`preview_scale`].
pub fn to_original(quad: &Quad, bounds: &Rect, scale: f64) -> Quad {
    quad.map(|p| Point::new((p.x - bounds.left) / scale, (p.y - bounds.top) / scale))
}

/// A preview placement for one photo, bundling bounds and scale so the two
/// cannot drift apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewMapping {
    bounds: Rect,
    scale: f64,
}

impl PreviewMapping {
    /// Build the mapping for a photo with the given original height.
    pub fn new(bounds: Rect, original_height: f64) -> Result<Self> {
        let scale = preview_scale(&bounds, original_height)?;
        Ok(Self { bounds, scale })
    }

    /// Fit a photo into a container and build the matching mapping.
    pub fn fit(
        original_width: u32,
        original_height: u32,
        container_width: f64,
        container_height: f64,
    ) -> Result<Self> {
        let bounds = fit_preview_bounds(
            original_width as f64,
            original_height as f64,
            container_width,
            container_height,
        )?;
        Self::new(bounds, original_height as f64)
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn to_preview(&self, quad: &Quad) -> Quad {
        to_preview(quad, &self.bounds, self.scale)
    }

    pub fn to_original(&self, quad: &Quad) -> Quad {
        to_original(quad, &self.bounds, self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_quads_close(a: &Quad, b: &Quad) {
        for (pa, pb) in a.points().iter().zip(b.points().iter()) {
            assert!(
                (pa.x - pb.x).abs() < EPS && (pa.y - pb.y).abs() < EPS,
                "{pa:?} != {pb:?}"
            );
        }
    }

    fn sample_quad() -> Quad {
        Quad::new(
            Point::new(40.0, 40.0),
            Point::new(1960.0, 55.5),
            Point::new(1900.25, 2960.0),
            Point::new(12.0, 2990.0),
        )
    }

    #[test]
    fn preview_round_trip() {
        let bounds = Rect::new(37.5, 0.0, 400.0, 600.0);
        for scale in [0.01, 0.2, 1.0, 3.75] {
            let q = sample_quad();
            let back = to_original(&to_preview(&q, &bounds, scale), &bounds, scale);
            assert_quads_close(&q, &back);
        }
    }

    #[test]
    fn to_preview_scales_then_offsets() {
        let bounds = Rect::new(10.0, 20.0, 100.0, 100.0);
        let q = Quad::new(
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 200.0),
            Point::new(0.0, 200.0),
        );
        let p = to_preview(&q, &bounds, 0.5);
        assert_eq!(p.top_left, Point::new(10.0, 20.0));
        assert_eq!(p.bottom_right, Point::new(60.0, 120.0));
    }

    #[test]
    fn zero_height_photo_is_invalid() {
        let bounds = Rect::new(0.0, 0.0, 300.0, 400.0);
        assert!(matches!(
            preview_scale(&bounds, 0.0),
            Err(ScanError::InvalidGeometry { .. })
        ));
        assert!(preview_scale(&bounds, -5.0).is_err());
    }

    #[test]
    fn fit_portrait_photo_in_wide_container_centres_horizontally() {
        let rect = fit_preview_bounds(1000.0, 2000.0, 800.0, 600.0).expect("fit");
        assert!((rect.height - 600.0).abs() < EPS);
        assert!((rect.width - 300.0).abs() < EPS);
        assert!((rect.left - 250.0).abs() < EPS);
        assert!(rect.top.abs() < EPS);
    }

    #[test]
    fn fit_landscape_photo_in_tall_container_is_width_limited() {
        let rect = fit_preview_bounds(4000.0, 1000.0, 400.0, 800.0).expect("fit");
        assert!((rect.width - 400.0).abs() < EPS);
        assert!((rect.height - 100.0).abs() < EPS);
        assert!((rect.top - 350.0).abs() < EPS);
    }

    #[test]
    fn mapping_matches_free_functions() {
        let mapping = PreviewMapping::fit(2000, 3000, 400.0, 600.0).expect("mapping");
        assert!((mapping.scale() - 0.2).abs() < EPS);
        let q = sample_quad();
        assert_quads_close(&mapping.to_original(&mapping.to_preview(&q)), &q);
    }
}
