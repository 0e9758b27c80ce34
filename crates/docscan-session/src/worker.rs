// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Background crop worker.
//
// A `CropJob` owns everything the crop needs, so it can run on a blocking
// thread while the session stays free. Its `CropTicket` records which page
// and which session revision the crop was started for; the coordinator
// compares it on return and discards results that no longer apply.

use std::sync::Arc;

use docscan_core::error::{Result, ScanError};
use docscan_core::types::PageId;
use docscan_document::{Imaging, Page, ScratchDir};
use tracing::{debug, error, instrument};

/// Identity of one crop request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropTicket {
    pub page: PageId,
    pub revision: u64,
}

/// A crop ready to run away from the session.
pub struct CropJob {
    ticket: CropTicket,
    page: Page,
    imaging: Arc<dyn Imaging>,
    store: ScratchDir,
    quality: u8,
}

/// Result of a crop job, tagged with its ticket.
#[derive(Debug)]
pub struct CropOutcome {
    pub ticket: CropTicket,
    pub result: Result<Page>,
}

impl CropJob {
    pub(crate) fn new(
        ticket: CropTicket,
        page: Page,
        imaging: Arc<dyn Imaging>,
        store: ScratchDir,
        quality: u8,
    ) -> Self {
        Self {
            ticket,
            page,
            imaging,
            store,
            quality,
        }
    }

    pub fn ticket(&self) -> CropTicket {
        self.ticket
    }

    /// Run the crop on the current thread.
    #[instrument(skip(self), fields(page = %self.ticket.page, revision = self.ticket.revision))]
    pub fn run(self) -> CropOutcome {
        let result = self
            .page
            .apply_crop(self.imaging.as_ref(), &self.store, self.quality);
        debug!(ok = result.is_ok(), "crop job finished");
        CropOutcome {
            ticket: self.ticket,
            result,
        }
    }

    /// Run the crop on tokio's blocking pool.
    pub async fn run_in_background(self) -> CropOutcome {
        let ticket = self.ticket;
        match tokio::task::spawn_blocking(move || self.run()).await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(error = %err, "crop worker did not complete");
                CropOutcome {
                    ticket,
                    result: Err(ScanError::CropFailure(format!(
                        "crop worker did not complete: {err}"
                    ))),
                }
            }
        }
    }
}
