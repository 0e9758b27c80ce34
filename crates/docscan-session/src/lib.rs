// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docscan-session — The multi-page scan flow.
//
// `DocumentSession` holds the pages and the pending page, `CaptureCoordinator`
// feeds it from the camera, picker, and shared files, the crop worker runs
// crops off the interactive thread, and the request/result modules are the
// method-call contract with the host app.

pub mod coordinator;
pub mod request;
pub mod result;
pub mod session;
pub mod worker;

#[cfg(test)]
pub(crate) mod testing;

pub use coordinator::{AcquireOutcome, CaptureCoordinator};
pub use request::{MethodCall, SessionPlan};
pub use result::{ResultAssembler, ScanResponse};
pub use session::{DocumentSession, FinalizedDocument, SessionState};
pub use worker::{CropJob, CropOutcome, CropTicket};
