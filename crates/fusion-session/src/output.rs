// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output delivery — hands a finished document to the host.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fusion_core::error::{FusionError, Result};
use fusion_core::types::OutputDocument;
use tracing::info;

/// Receives a successfully composed document under a suggested file name.
pub trait OutputSink: Send + Sync {
    fn deliver(&self, file_name: &str, document: &OutputDocument) -> Result<()>;
}

/// Writes merged documents into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl OutputSink for DirectorySink {
    fn deliver(&self, file_name: &str, document: &OutputDocument) -> Result<()> {
        let path = self.dir.join(file_name);
        std::fs::write(&path, document.as_bytes())
            .map_err(|e| FusionError::Output(format!("{}: {e}", path.display())))?;
        info!(path = %path.display(), bytes = document.len(), "Merged PDF written");
        Ok(())
    }
}

/// `{prefix}-{unix millis}.pdf`
pub fn output_file_name(prefix: &str, at: DateTime<Utc>) -> String {
    format!("{prefix}-{}.pdf", at.timestamp_millis())
}
