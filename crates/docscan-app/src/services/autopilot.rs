// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Autopilot — runs a whole scan session without a corner editor.
//
// Pages are added until the user dismisses the dialog or the page limit is
// reached. Each page is cropped with its detected (or fallback) corners as
// soon as it arrives.

use std::sync::Arc;

use docscan_bridge::ScannerBridge;
use docscan_core::config::ScanConfig;
use docscan_core::error::Result;
use docscan_core::types::ScanAction;
use docscan_session::{AcquireOutcome, CaptureCoordinator, MethodCall, ResultAssembler, ScanResponse};
use tracing::{info, instrument, warn};

/// Options that come from the command line rather than the host request.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Document name to use instead of the generated one.
    pub name: Option<String>,
}

/// Run `call` to completion and build the host payload.
///
/// Never fails: every error ends up on the payload's error channel.
#[instrument(skip_all)]
pub async fn run(
    call: &MethodCall,
    base: &ScanConfig,
    bridge: Arc<dyn ScannerBridge>,
    options: &RunOptions,
) -> ScanResponse {
    match drive(call, base, bridge, options).await {
        Ok(response) => response,
        Err(err) => ResultAssembler::failure(&err),
    }
}

async fn drive(
    call: &MethodCall,
    base: &ScanConfig,
    bridge: Arc<dyn ScannerBridge>,
    options: &RunOptions,
) -> Result<ScanResponse> {
    let plan = call.plan(base)?;
    info!(platform = bridge.platform_name(), max = plan.config.max_num_documents, "session opened");
    let mut coordinator =
        CaptureCoordinator::new(plan.config, bridge)?.with_shared_files(plan.shared_files);
    if let Some(name) = options.name.as_deref() {
        coordinator.rename(name);
    }

    while coordinator.can_add_page() {
        let outcome = match coordinator.acquire(ScanAction::Add) {
            Ok(outcome) => outcome,
            // Keep what was already scanned when only this page failed.
            Err(err) if err.is_recoverable() && !coordinator.session().is_empty() => {
                warn!(error = %err, "acquisition failed, finishing with scanned pages");
                break;
            }
            Err(err) => {
                coordinator.cancel();
                return Err(err);
            }
        };
        if let Some(response) = ResultAssembler::from_outcome(&outcome) {
            return Ok(response);
        }
        if !matches!(outcome, AcquireOutcome::Pending(_)) {
            break;
        }
        if let Err(err) = coordinator.apply_pending().await {
            coordinator.cancel();
            return Err(err);
        }
    }

    Ok(ResultAssembler::finish(&mut coordinator))
}
