// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Docscan.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{PageId, ScanAction};

/// Top-level error type for all Docscan operations.
#[derive(Debug, Error)]
pub enum ScanError {
    // -- Acquisition --
    #[error("image acquisition failed: {0}")]
    Acquisition(String),

    #[error("page limit of {max} reached")]
    PageLimitReached { max: usize },

    #[error("{action} is not available in this session")]
    ActionUnavailable { action: ScanAction },

    // -- Geometry / imaging --
    #[error("invalid photo geometry: {width}x{height}")]
    InvalidGeometry { width: f64, height: f64 },

    #[error("corners must be four distinct points in clockwise order")]
    MalformedCorners,

    #[error("unable to crop image: {0}")]
    CropFailure(String),

    // -- Session state --
    #[error("page {index} has no cropped image")]
    IncompletePage { index: usize },

    #[error("page index {index} out of range (session has {len} pages)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("no page is waiting to be committed")]
    NoPendingPage,

    #[error("no acquisition is in progress")]
    NoPendingAction,

    #[error("page {page} is no longer the target of this operation")]
    StalePage { page: PageId },

    #[error("a crop is already being applied")]
    ApplyInFlight,

    #[error("the scan session has already ended")]
    SessionClosed,

    // -- Configuration --
    #[error("invalid option: {0}")]
    InvalidConfig(String),

    // -- Storage / serialization --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,
}

/// Coarse error classification reported to the host alongside the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    AcquisitionError,
    InvalidGeometry,
    CropFailure,
    IncompletePage,
    InvalidState,
    InvalidConfig,
    Internal,
}

impl ScanError {
    /// Classify this error for host-side handling.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Acquisition(_)
            | Self::Bridge(_)
            | Self::PlatformUnavailable
            | Self::PageLimitReached { .. }
            | Self::ActionUnavailable { .. } => ErrorKind::AcquisitionError,
            Self::InvalidGeometry { .. } | Self::MalformedCorners => ErrorKind::InvalidGeometry,
            Self::CropFailure(_) => ErrorKind::CropFailure,
            Self::IncompletePage { .. } => ErrorKind::IncompletePage,
            Self::IndexOutOfRange { .. }
            | Self::NoPendingPage
            | Self::NoPendingAction
            | Self::StalePage { .. }
            | Self::ApplyInFlight
            | Self::SessionClosed => ErrorKind::InvalidState,
            Self::InvalidConfig(_) => ErrorKind::InvalidConfig,
            Self::Io(_) | Self::Serialization(_) => ErrorKind::Internal,
        }
    }

    /// Whether the session can carry on after this error.
    ///
    /// Acquisition problems, stale results, and badly dragged corners only
    /// cost the current page; everything else ends the session with an
    /// error payload.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::MalformedCorners)
            || matches!(
                self.kind(),
                ErrorKind::AcquisitionError | ErrorKind::InvalidState
            )
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ScanError>;
