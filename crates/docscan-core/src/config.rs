// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan session configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanError};

/// JPEG quality used for cropped pages when the host does not set one.
pub const DEFAULT_CROPPED_IMAGE_QUALITY: u8 = 80;
/// Page limit used when the host does not set one.
pub const DEFAULT_MAX_NUM_DOCUMENTS: usize = 50;
/// Inset of the fallback quad from each photo edge when no corners are found.
pub const DEFAULT_CORNER_FALLBACK_MARGIN: f64 = 40.0;

/// Options accepted at session start.
///
/// Field names serialize in camelCase so a host can pass the same keys the
/// plugin has always accepted (`croppedImageQuality`, `maxNumDocuments`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScanConfig {
    /// JPEG quality (0-100) of the cropped page files.
    pub cropped_image_quality: u8,
    /// Maximum number of pages one session may hold.
    pub max_num_documents: usize,
    /// Corner inset used when detection finds nothing.
    pub corner_fallback_margin: f64,
    /// Picker-first session: every ADD goes to the file picker.
    pub gallery_mode: bool,
    /// Camera-first session that may still reselect from the gallery.
    pub allow_gallery_import: bool,
    /// Directory for original and cropped scratch files. `None` uses the
    /// system temp directory.
    pub scratch_dir: Option<PathBuf>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            cropped_image_quality: DEFAULT_CROPPED_IMAGE_QUALITY,
            max_num_documents: DEFAULT_MAX_NUM_DOCUMENTS,
            corner_fallback_margin: DEFAULT_CORNER_FALLBACK_MARGIN,
            gallery_mode: false,
            allow_gallery_import: false,
            scratch_dir: None,
        }
    }
}

impl ScanConfig {
    /// Check every option, returning the first invalid one.
    pub fn validate(&self) -> Result<()> {
        if self.cropped_image_quality > 100 {
            return Err(ScanError::InvalidConfig(format!(
                "croppedImageQuality must be a number between 0 and 100, got {}",
                self.cropped_image_quality
            )));
        }
        if self.max_num_documents == 0 {
            return Err(ScanError::InvalidConfig(
                "maxNumDocuments must be a positive number".into(),
            ));
        }
        if !self.corner_fallback_margin.is_finite() || self.corner_fallback_margin < 0.0 {
            return Err(ScanError::InvalidConfig(format!(
                "cornerFallbackMargin must be a non-negative number, got {}",
                self.corner_fallback_margin
            )));
        }
        Ok(())
    }

    /// Whether the user may reach the file picker from this session.
    pub fn picker_available(&self) -> bool {
        self.gallery_mode || self.allow_gallery_import
    }
}

/// Name given to a new document before the user renames it.
pub fn default_document_name() -> String {
    format!("Scanned_{}", chrono::Utc::now().timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ScanConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_num_documents, 50);
        assert_eq!(config.corner_fallback_margin, 40.0);
    }

    #[test]
    fn quality_above_100_is_rejected() {
        let config = ScanConfig {
            cropped_image_quality: 101,
            ..ScanConfig::default()
        };
        assert!(matches!(config.validate(), Err(ScanError::InvalidConfig(_))));
    }

    #[test]
    fn zero_page_limit_is_rejected() {
        let config = ScanConfig {
            max_num_documents: 0,
            ..ScanConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn negative_margin_is_rejected() {
        let config = ScanConfig {
            corner_fallback_margin: -1.0,
            ..ScanConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: ScanConfig =
            serde_json::from_str(r#"{"maxNumDocuments": 3}"#).expect("deserialize");
        assert_eq!(config.max_num_documents, 3);
        assert_eq!(config.cropped_image_quality, DEFAULT_CROPPED_IMAGE_QUALITY);
    }

    #[test]
    fn default_name_has_scanned_prefix() {
        let name = default_document_name();
        assert!(name.starts_with("Scanned_"));
        assert!(name["Scanned_".len()..].parse::<i64>().is_ok());
    }
}
