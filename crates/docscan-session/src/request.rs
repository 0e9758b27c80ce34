// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Host method calls — the two ways a host app starts a scan.
//
// ```json
// {"method": "getPictures", "arguments": {"noOfPages": 5, "isGalleryImportAllowed": true}}
// {"method": "selectDocuments", "arguments": {"sharedFiles": ["/storage/report.pdf"]}}
// ```

use std::path::PathBuf;

use docscan_core::config::{DEFAULT_MAX_NUM_DOCUMENTS, ScanConfig};
use docscan_core::error::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A scan request from the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "arguments", rename_all = "camelCase")]
pub enum MethodCall {
    /// Camera-first session.
    GetPictures(GetPicturesArgs),
    /// Picker-first session, optionally seeded with shared files.
    SelectDocuments(SelectDocumentsArgs),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetPicturesArgs {
    #[serde(alias = "maxPages")]
    pub no_of_pages: usize,
    pub is_gallery_import_allowed: bool,
    pub cropped_image_quality: Option<u8>,
    pub corner_fallback_margin: Option<f64>,
}

impl Default for GetPicturesArgs {
    fn default() -> Self {
        Self {
            no_of_pages: DEFAULT_MAX_NUM_DOCUMENTS,
            is_gallery_import_allowed: false,
            cropped_image_quality: None,
            corner_fallback_margin: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectDocumentsArgs {
    #[serde(alias = "maxPages")]
    pub no_of_pages: usize,
    pub shared_files: Option<Vec<PathBuf>>,
    pub cropped_image_quality: Option<u8>,
    pub corner_fallback_margin: Option<f64>,
}

impl Default for SelectDocumentsArgs {
    fn default() -> Self {
        Self {
            no_of_pages: DEFAULT_MAX_NUM_DOCUMENTS,
            shared_files: None,
            cropped_image_quality: None,
            corner_fallback_margin: None,
        }
    }
}

/// Everything needed to open a coordinator for a request.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionPlan {
    pub config: ScanConfig,
    pub shared_files: Vec<PathBuf>,
}

impl MethodCall {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Layer the request's arguments over `base` and validate the result.
    pub fn plan(&self, base: &ScanConfig) -> Result<SessionPlan> {
        let mut config = base.clone();
        let shared_files = match self {
            Self::GetPictures(args) => {
                config.max_num_documents = args.no_of_pages;
                config.gallery_mode = false;
                config.allow_gallery_import = args.is_gallery_import_allowed;
                apply_overrides(&mut config, args.cropped_image_quality, args.corner_fallback_margin);
                Vec::new()
            }
            Self::SelectDocuments(args) => {
                config.max_num_documents = args.no_of_pages;
                config.gallery_mode = true;
                apply_overrides(&mut config, args.cropped_image_quality, args.corner_fallback_margin);
                args.shared_files.clone().unwrap_or_default()
            }
        };
        config.validate()?;
        debug!(?config, shared = shared_files.len(), "session planned");
        Ok(SessionPlan {
            config,
            shared_files,
        })
    }
}

fn apply_overrides(config: &mut ScanConfig, quality: Option<u8>, margin: Option<f64>) {
    if let Some(quality) = quality {
        config.cropped_image_quality = quality;
    }
    if let Some(margin) = margin {
        config.corner_fallback_margin = margin;
    }
}
