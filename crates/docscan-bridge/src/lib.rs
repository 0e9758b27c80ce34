// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docscan-bridge — Native capability traits for the scanner.
//
// The session never touches a camera or file picker directly. Hosts embed
// the scanner with their own `ScannerBridge`; desktop and CI builds get the
// stub, which reports every capability as unavailable.

pub mod traits;

pub mod stub;

pub use traits::{
    CapturedPhoto, NativeCamera, NativeFilePicker, NativeMimeTypes, PickedFile, ScannerBridge,
    PICKER_MIME_TYPES,
};

