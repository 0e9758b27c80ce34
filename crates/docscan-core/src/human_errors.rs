// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages shown as toasts or error dialogs.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Severity drives whether the UI shows a toast and stays on the page list or
// closes the scanner.

use crate::error::ScanError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Only the current page was lost; show a toast and keep going.
    Transient,
    /// User must do something (grant a permission, pick another file).
    ActionRequired,
    /// The scan cannot continue.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading or toast).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether trying the same action again may work.
    pub retriable: bool,
    /// Severity level (drives toast versus dialog).
    pub severity: Severity,
}

/// Convert a `ScanError` into a `HumanError`.
pub fn humanize_error(err: &ScanError) -> HumanError {
    match err {
        ScanError::Acquisition(_) => HumanError {
            message: "We couldn't get that photo.".into(),
            suggestion: "Try again. Your other pages are still here.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        ScanError::PageLimitReached { max } => HumanError {
            message: format!("You can scan up to {max} pages."),
            suggestion: "Finish this document first, then start a new one for the rest.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        ScanError::ActionUnavailable { .. } => HumanError {
            message: "That option isn't available here.".into(),
            suggestion: "Use the camera or the page list instead.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        ScanError::InvalidGeometry { .. } => HumanError {
            message: "This image has no usable size.".into(),
            suggestion: "The file may be damaged. Try taking the photo again.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        ScanError::MalformedCorners => HumanError {
            message: "These corners don't outline a page.".into(),
            suggestion: "Drag the corners so they frame the page without crossing.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        ScanError::CropFailure(_) => HumanError {
            message: "We couldn't crop this page.".into(),
            suggestion: "The image may be damaged or in an unusual format. Try a JPEG or PNG.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        ScanError::IncompletePage { index } => HumanError {
            message: format!("Page {} hasn't been cropped yet.", index + 1),
            suggestion: "Open the page, adjust the corners, and tap Apply.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        ScanError::IndexOutOfRange { .. }
        | ScanError::NoPendingPage
        | ScanError::NoPendingAction
        | ScanError::StalePage { .. } => HumanError {
            message: "That page changed while we were working on it.".into(),
            suggestion: "Check the page list and try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        ScanError::ApplyInFlight => HumanError {
            message: "Still cropping the page.".into(),
            suggestion: "Wait a moment for it to finish.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        ScanError::SessionClosed => HumanError {
            message: "This scan has already finished.".into(),
            suggestion: "Start a new scan.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        ScanError::InvalidConfig(detail) => HumanError {
            message: "The scanner was started with invalid options.".into(),
            suggestion: format!("Please report this to the app developer. ({detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        ScanError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Try choosing the file again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "The app doesn't have permission to read that file.".into(),
                    suggestion: "Check the app's storage permission, then try again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your device's storage may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        ScanError::Serialization(_) => HumanError {
            message: "The scanner had an internal data problem.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        ScanError::Bridge(_) => HumanError {
            message: "The camera or file picker didn't open.".into(),
            suggestion: "Check the app has camera and storage permission, then try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        ScanError::PlatformUnavailable => HumanError {
            message: "This feature isn't available on your device.".into(),
            suggestion: "Try choosing an existing photo instead.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },
    }
}
