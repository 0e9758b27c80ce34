// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Result assembler — the one place a session's outcome becomes the payload
// the host receives.
//
// Three shapes, told apart by their keys:
//   success / passthrough  {"images": [...], "name": "..."}
//   cancelled              {"images": []}
//   error                  {"error": "...", "code": "CROP_FAILURE"}

use docscan_core::error::{ErrorKind, Result, ScanError};
use docscan_core::human_errors::humanize_error;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::coordinator::{AcquireOutcome, CaptureCoordinator};
use crate::session::FinalizedDocument;

/// Payload returned to the host app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScanResponse {
    Documents { images: Vec<String>, name: String },
    Failure { error: String, code: ErrorKind },
    Cancelled { images: Vec<String> },
}

impl ScanResponse {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Builds `ScanResponse`s.
pub struct ResultAssembler;

impl ResultAssembler {
    /// Payload for a finalized document. A document with no pages is a
    /// cancellation.
    pub fn success(doc: FinalizedDocument) -> ScanResponse {
        if doc.images.is_empty() {
            return Self::cancelled();
        }
        let images = doc
            .images
            .iter()
            .map(|path| path.to_string_lossy().into_owned())
            .collect();
        ScanResponse::Documents {
            images,
            name: doc.name,
        }
    }

    pub fn cancelled() -> ScanResponse {
        ScanResponse::Cancelled { images: Vec::new() }
    }

    /// Error payload with a plain-English message and the error's code.
    pub fn failure(err: &ScanError) -> ScanResponse {
        let code = err.kind();
        error!(error = %err, ?code, "scan ended with an error");
        ScanResponse::Failure {
            error: humanize_error(err).message,
            code,
        }
    }

    /// Finalize the coordinator's session and build its payload.
    pub fn finish(coordinator: &mut CaptureCoordinator) -> ScanResponse {
        match coordinator.finish() {
            Ok(doc) => {
                info!(pages = doc.images.len(), "scan finished");
                Self::success(doc)
            }
            Err(err) => Self::failure(&err),
        }
    }

    /// Payload for an acquisition that ended the session, if it did.
    pub fn from_outcome(outcome: &AcquireOutcome) -> Option<ScanResponse> {
        match outcome {
            AcquireOutcome::Passthrough(doc) => Some(Self::success(doc.clone())),
            AcquireOutcome::Aborted => Some(Self::cancelled()),
            AcquireOutcome::Pending(_) | AcquireOutcome::Resumed => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn documents_serialize_as_images_and_name() {
        let response = ResultAssembler::success(FinalizedDocument {
            images: vec![PathBuf::from("/s/CROP_1.jpg"), PathBuf::from("/s/CROP_2.jpg")],
            name: "Scanned_1700000000".into(),
        });
        let json: serde_json::Value =
            serde_json::from_str(&response.to_json().expect("json")).expect("parse");
        assert_eq!(
            json,
            serde_json::json!({
                "images": ["/s/CROP_1.jpg", "/s/CROP_2.jpg"],
                "name": "Scanned_1700000000"
            })
        );
    }

    #[test]
    fn cancelled_is_empty_images_only() {
        let json = ResultAssembler::cancelled().to_json().expect("json");
        assert_eq!(json, r#"{"images":[]}"#);
        let empty = ResultAssembler::success(FinalizedDocument {
            images: Vec::new(),
            name: "x".into(),
        });
        assert!(empty.is_cancelled());
    }

    #[test]
    fn crop_failure_goes_on_the_error_channel() {
        let response = ResultAssembler::failure(&ScanError::CropFailure("decode".into()));
        assert!(response.is_failure());
        let json: serde_json::Value =
            serde_json::from_str(&response.to_json().expect("json")).expect("parse");
        assert_eq!(json["code"], "CROP_FAILURE");
        assert!(json["error"].as_str().is_some_and(|m| !m.is_empty()));
        assert!(json.get("images").is_none());
    }

    #[test]
    fn responses_parse_back_into_the_right_shape() {
        let parsed: ScanResponse =
            serde_json::from_str(r#"{"error":"nope","code":"INCOMPLETE_PAGE"}"#).expect("parse");
        assert_eq!(
            parsed,
            ScanResponse::Failure {
                error: "nope".into(),
                code: ErrorKind::IncompletePage
            }
        );
        let parsed: ScanResponse = serde_json::from_str(r#"{"images":[]}"#).expect("parse");
        assert!(parsed.is_cancelled());
    }
}
