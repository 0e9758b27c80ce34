// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — the imaging capability the page model depends on, and its
// default implementation on top of `ImageProcessor`.

pub mod ops;
pub mod processor;

pub use ops::{Imaging, ProcessorImaging};
pub use processor::ImageProcessor;
