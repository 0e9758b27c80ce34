// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docscan-document — Image-side work for the Docscan page assembler.
//
// Provides the page model, preview geometry (original <-> preview space),
// fallback corner quads, the imaging capability with its `image`/`imageproc`
// implementation, the scratch-file store, and content-type sniffing.

pub mod corners;
pub mod geometry;
pub mod image;
pub mod mime;
pub mod page;
pub mod store;

// Re-export the primary types so callers can use `docscan_document::Page` etc.
pub use corners::{CornerDetector, NoCornerDetection};
pub use geometry::PreviewMapping;
pub use crate::image::{ImageProcessor, Imaging, ProcessorImaging};
pub use page::Page;
pub use store::ScratchDir;
