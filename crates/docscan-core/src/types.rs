// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Docscan page assembler.

use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// Unique identifier for a scanned page.
///
/// Identity survives corner edits and rotation, so an in-flight crop can tell
/// whether the page it was started for is still the one in the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageId(pub Uuid);

impl PageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A point in either original-photo or preview coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Return this point moved by `(dx, dy)`.
    pub fn translate(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Document boundary as four corners, clockwise from the top-left.
///
/// A quad carries no record of which coordinate space it lives in; the
/// geometry module is the only place that converts between spaces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quad {
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_right: Point,
    pub bottom_left: Point,
}

impl Quad {
    pub const fn new(
        top_left: Point,
        top_right: Point,
        bottom_right: Point,
        bottom_left: Point,
    ) -> Self {
        Self {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
        }
    }

    /// Corners in clockwise order starting at the top-left.
    pub fn points(&self) -> [Point; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }

    /// Apply `f` to every corner, keeping the rotational order.
    pub fn map(&self, f: impl Fn(Point) -> Point) -> Self {
        Self {
            top_left: f(self.top_left),
            top_right: f(self.top_right),
            bottom_right: f(self.bottom_right),
            bottom_left: f(self.bottom_left),
        }
    }

    /// Whether all four corners are pairwise distinct.
    pub fn has_distinct_corners(&self) -> bool {
        let pts = self.points();
        for i in 0..pts.len() {
            for j in (i + 1)..pts.len() {
                if pts[i] == pts[j] {
                    return false;
                }
            }
        }
        true
    }

    /// Whether the quad is strictly convex with a consistent winding.
    ///
    /// A convex quad can never self-intersect.
    pub fn is_convex(&self) -> bool {
        let pts = self.points();
        let mut sign = 0.0f64;
        for i in 0..4 {
            let a = pts[i];
            let b = pts[(i + 1) % 4];
            let c = pts[(i + 2) % 4];
            let cross = (b.x - a.x) * (c.y - b.y) - (b.y - a.y) * (c.x - b.x);
            if cross == 0.0 {
                return false;
            }
            if sign == 0.0 {
                sign = cross.signum();
            } else if cross.signum() != sign {
                return false;
            }
        }
        true
    }

    /// Four distinct corners forming a convex outline that runs clockwise on
    /// screen (y pointing down). Anything else would crop to a folded or
    /// mirrored page.
    pub fn is_well_formed(&self) -> bool {
        self.has_distinct_corners() && self.is_convex() && self.signed_area() > 0.0
    }

    /// Shoelace area; positive for clockwise order with y pointing down.
    fn signed_area(&self) -> f64 {
        let pts = self.points();
        let twice: f64 = (0..4)
            .map(|i| {
                let (a, b) = (pts[i], pts[(i + 1) % 4]);
                a.x * b.y - b.x * a.y
            })
            .sum();
        twice / 2.0
    }

    /// Whether every corner lies within `[0, width] x [0, height]`.
    pub fn fits_within(&self, width: f64, height: f64) -> bool {
        self.points()
            .iter()
            .all(|p| p.x >= 0.0 && p.y >= 0.0 && p.x <= width && p.y <= height)
    }
}

/// Axis-aligned rectangle, used for the on-screen preview area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// User action that decides how the next acquired or edited page merges
/// into the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanAction {
    /// No acquisition or edit in progress.
    None,
    /// Append a new page after the last one.
    Add,
    /// Replace the focused page with a fresh camera capture.
    Retake,
    /// Replace the focused page with a fresh picker selection.
    Reselect,
    /// Re-crop the focused page without acquiring a new image.
    Edit,
}

impl ScanAction {
    /// Whether committing under this action replaces the focused page in place.
    pub fn replaces_focused(&self) -> bool {
        matches!(self, Self::Retake | Self::Reselect | Self::Edit)
    }
}

impl std::fmt::Display for ScanAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::None => "NONE",
            Self::Add => "ADD",
            Self::Retake => "RETAKE",
            Self::Reselect => "RESELECT",
            Self::Edit => "EDIT",
        };
        f.write_str(label)
    }
}

/// Where a new image comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcquisitionSource {
    Camera,
    Picker,
    /// A file the host app shared into the scanner at session start.
    SharedFile,
}

/// Quarter-turn rotation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RotationDirection {
    #[default]
    Clockwise,
    CounterClockwise,
}

impl RotationDirection {
    pub fn reversed(self) -> Self {
        match self {
            Self::Clockwise => Self::CounterClockwise,
            Self::CounterClockwise => Self::Clockwise,
        }
    }
}

/// Content types the scanner distinguishes between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    Jpeg,
    Png,
    Webp,
    Tiff,
    Bmp,
    Heic,
    Pdf,
    /// Office formats and anything else handed over as an opaque document.
    OtherDocument,
}

impl DocumentType {
    /// MIME type string.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
            Self::Tiff => "image/tiff",
            Self::Bmp => "image/bmp",
            Self::Heic => "image/heic",
            Self::Pdf => "application/pdf",
            Self::OtherDocument => "application/octet-stream",
        }
    }

    /// Infer document type from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "webp" => Some(Self::Webp),
            "tif" | "tiff" => Some(Self::Tiff),
            "bmp" => Some(Self::Bmp),
            "heic" | "heif" => Some(Self::Heic),
            "pdf" => Some(Self::Pdf),
            "docx" | "doc" | "xlsx" | "xls" | "pptx" | "ppt" | "odt" | "ods" | "txt" => {
                Some(Self::OtherDocument)
            }
            _ => None,
        }
    }

    /// Infer document type from the extension of `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Parse a MIME string as reported by a picker.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/webp" => Some(Self::Webp),
            "image/tiff" => Some(Self::Tiff),
            "image/bmp" => Some(Self::Bmp),
            "image/heic" | "image/heif" => Some(Self::Heic),
            "application/pdf" => Some(Self::Pdf),
            "" => None,
            other if other.starts_with("image/") => None,
            _ => Some(Self::OtherDocument),
        }
    }

    /// Whether the scanner can crop this type, as opposed to passing it through.
    pub fn is_raster_image(&self) -> bool {
        !matches!(self, Self::Pdf | Self::OtherDocument)
    }
}

/// Whether a MIME string names a raster image the scanner can crop.
///
/// Unknown `image/*` subtypes still count as images; anything outside the
/// `image/` family is a document.
pub fn is_image_mime(mime: &str) -> bool {
    match DocumentType::from_mime(mime) {
        Some(doc) => doc.is_raster_image(),
        None => mime.trim().to_ascii_lowercase().starts_with("image/"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: f64) -> Quad {
        Quad::new(
            Point::new(0.0, 0.0),
            Point::new(size, 0.0),
            Point::new(size, size),
            Point::new(0.0, size),
        )
    }

    #[test]
    fn translate_moves_both_axes() {
        let p = Point::new(1.0, 2.0).translate(40.0, -40.0);
        assert_eq!(p, Point::new(41.0, -38.0));
    }

    #[test]
    fn square_is_convex() {
        assert!(square(10.0).is_convex());
        assert!(square(10.0).has_distinct_corners());
    }

    #[test]
    fn bow_tie_is_not_convex() {
        let q = square(10.0);
        let crossed = Quad::new(q.top_left, q.top_right, q.bottom_left, q.bottom_right);
        assert!(!crossed.is_convex());
    }

    #[test]
    fn collapsed_quad_is_not_convex() {
        let p = Point::new(5.0, 5.0);
        let q = Quad::new(p, p, p, p);
        assert!(!q.is_convex());
        assert!(!q.has_distinct_corners());
    }

    #[test]
    fn well_formed_needs_clockwise_order() {
        let q = square(10.0);
        assert!(q.is_well_formed());
        let mirrored = Quad::new(q.top_right, q.top_left, q.bottom_left, q.bottom_right);
        assert!(mirrored.is_convex());
        assert!(!mirrored.is_well_formed());
        let crossed = Quad::new(q.top_left, q.top_right, q.bottom_left, q.bottom_right);
        assert!(!crossed.is_well_formed());
    }

    #[test]
    fn replacing_actions() {
        assert!(ScanAction::Retake.replaces_focused());
        assert!(ScanAction::Reselect.replaces_focused());
        assert!(ScanAction::Edit.replaces_focused());
        assert!(!ScanAction::Add.replaces_focused());
        assert!(!ScanAction::None.replaces_focused());
    }

    #[test]
    fn pdf_is_not_an_image() {
        assert_eq!(DocumentType::from_path("/tmp/report.PDF"), Some(DocumentType::Pdf));
        assert!(!is_image_mime("application/pdf"));
        assert!(!is_image_mime("application/vnd.openxmlformats-officedocument.wordprocessingml.document"));
        assert!(is_image_mime("image/jpeg"));
        assert!(is_image_mime("image/x-unknown-raw"));
    }

    #[test]
    fn action_serializes_as_upper_case() {
        let json = serde_json::to_string(&ScanAction::Reselect).expect("serialize");
        assert_eq!(json, "\"RESELECT\"");
    }
}
