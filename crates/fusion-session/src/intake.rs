// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// File intake — turns host-supplied files into input sources.
//
// Only PDF, JPEG and PNG files are accepted; anything else in a batch is
// dropped with a warning. Each accepted file gets a fresh identity and a
// preview handle.

use std::path::Path;

use chrono::{DateTime, Utc};
use fusion_core::error::Result;
use fusion_core::types::{InputSource, MediaKind, Payload, SourceId};
use tracing::{debug, warn};

use crate::preview::PreviewRegistry;

/// A file as the host hands it over: a name, a declared content type, a
/// modification time, and the bytes (or where to find them).
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub name: String,
    pub content_type: String,
    pub last_modified: DateTime<Utc>,
    pub payload: Payload,
}

impl IncomingFile {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        last_modified: DateTime<Utc>,
        payload: Payload,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            last_modified,
            payload,
        }
    }

    /// Describe a file on disk. The content type is inferred from the
    /// extension; the bytes are read later, when the merge reaches it.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path)?;
        let last_modified = metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let kind = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(MediaKind::from_extension)
            .unwrap_or_else(|| MediaKind::Other("application/octet-stream".into()));

        Ok(Self {
            name,
            content_type: kind.mime_type().to_string(),
            last_modified,
            payload: Payload::from_path(path),
        })
    }
}

/// Accept a batch of incoming files, keeping only supported kinds, in the
/// order given.
pub fn accept(
    batch: impl IntoIterator<Item = IncomingFile>,
    previews: &dyn PreviewRegistry,
) -> Vec<InputSource> {
    batch
        .into_iter()
        .filter_map(|file| {
            let kind = MediaKind::from_content_type(&file.content_type);
            if !kind.is_supported() {
                warn!(name = %file.name, %kind, "Unsupported file type skipped");
                return None;
            }
            let id = SourceId::generate(&file.name, file.last_modified);
            let preview = previews.register(&file.name, &file.payload);
            debug!(%id, %kind, bytes = ?file.payload.len_hint(), "File accepted");
            Some(InputSource::new(id, file.name, file.payload, kind, preview))
        })
        .collect()
}
