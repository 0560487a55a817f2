// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Merge configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FusionError, Result};

/// Header versions a merged document may declare.
const PDF_VERSIONS: [&str; 9] = ["1.0", "1.1", "1.2", "1.3", "1.4", "1.5", "1.6", "1.7", "2.0"];

/// Settings that shape the merged output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    /// Geometry of the blank pages created for JPEG/PNG sources.
    pub page_size: crate::PaperSize,
    /// File name prefix for merged output (`{prefix}-{unix_millis}.pdf`).
    pub output_prefix: String,
    /// PDF header version written to the merged document.
    pub pdf_version: String,
    /// Compress uncompressed streams before serialising.
    pub compress_output: bool,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            page_size: crate::PaperSize::Letter,
            output_prefix: "merged-document".to_string(),
            pdf_version: "1.7".to_string(),
            compress_output: true,
        }
    }
}

impl FusionConfig {
    /// Read a configuration file written by [`FusionConfig::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, falling back to defaults when the file is missing or
    /// unusable.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Write this configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Reject values that would produce unusable output.
    pub fn validate(&self) -> Result<()> {
        let (width, height) = self.page_size.dimensions_pt();
        if width <= 0.0 || height <= 0.0 {
            return Err(FusionError::Config(format!(
                "page size must be positive, got {width}x{height}pt"
            )));
        }
        if self.output_prefix.trim().is_empty() {
            return Err(FusionError::Config("output prefix is empty".into()));
        }
        if self.output_prefix.contains(['/', '\\']) {
            return Err(FusionError::Config(format!(
                "output prefix must not contain path separators: {}",
                self.output_prefix
            )));
        }
        if !PDF_VERSIONS.contains(&self.pdf_version.as_str()) {
            return Err(FusionError::Config(format!(
                "unsupported PDF version: {}",
                self.pdf_version
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PaperSize;

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("fusion.json");

        let config = FusionConfig {
            page_size: PaperSize::A4,
            output_prefix: "bundle".into(),
            ..FusionConfig::default()
        };
        config.save(&path).expect("save");

        let loaded = FusionConfig::load(&path).expect("load");
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: FusionConfig =
            serde_json::from_str(r#"{ "output_prefix": "joined" }"#).expect("parse");
        assert_eq!(config.page_size, PaperSize::Letter);
        assert_eq!(config.output_prefix, "joined");
        assert!(config.compress_output);
    }

    #[test]
    fn missing_file_falls_back_to_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = FusionConfig::load_or_default(dir.path().join("absent.json"));
        assert_eq!(config, FusionConfig::default());
    }

    #[test]
    fn zero_sized_custom_page_is_rejected() {
        let config = FusionConfig {
            page_size: PaperSize::Custom {
                width_pt: 0,
                height_pt: 792,
            },
            ..FusionConfig::default()
        };
        assert!(matches!(config.validate(), Err(FusionError::Config(_))));
    }

    #[test]
    fn prefix_with_separator_is_rejected() {
        let config = FusionConfig {
            output_prefix: "../escape".into(),
            ..FusionConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_pdf_version_is_rejected() {
        for version in ["abc", "1.8", "2", ""] {
            let config = FusionConfig {
                pdf_version: version.into(),
                ..FusionConfig::default()
            };
            assert!(
                matches!(config.validate(), Err(FusionError::Config(_))),
                "{version:?} accepted"
            );
        }

        let config = FusionConfig {
            pdf_version: "2.0".into(),
            ..FusionConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
