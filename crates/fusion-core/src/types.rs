// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for PDF Fusion.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an input source.
///
/// Combines the original file name, its last-modification time in
/// milliseconds, and a random UUID. Name and timestamp alone collide when the
/// same file is added twice in one batch; the UUID never does.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceId(String);

impl SourceId {
    /// Generate a fresh identity for a file.
    pub fn generate(file_name: &str, last_modified: DateTime<Utc>) -> Self {
        Self(format!(
            "{}-{}-{}",
            file_name,
            last_modified.timestamp_millis(),
            Uuid::new_v4()
        ))
    }

    /// Wrap an identity produced elsewhere (e.g. restored by a host).
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Classification of an input source, derived once from its declared
/// content type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaKind {
    Pdf,
    Jpeg,
    Png,
    /// Anything else, carrying the declared content type verbatim.
    Other(String),
}

impl MediaKind {
    /// Classify a declared MIME content type.
    pub fn from_content_type(content_type: &str) -> Self {
        // Parameters such as "; charset=binary" do not change the kind.
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "application/pdf" => Self::Pdf,
            "image/jpeg" => Self::Jpeg,
            "image/png" => Self::Png,
            _ => Self::Other(content_type.to_string()),
        }
    }

    /// Infer the kind from a file extension, for hosts that only have paths.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "jpg" | "jpeg" => Self::Jpeg,
            "png" => Self::Png,
            _ => Self::Other("application/octet-stream".to_string()),
        }
    }

    /// MIME type string.
    pub fn mime_type(&self) -> &str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Other(content_type) => content_type,
        }
    }

    /// Whether the composer knows how to handle this kind.
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime_type())
    }
}

/// The raw bytes of an input file, captured at acquisition.
///
/// Cloning is cheap: in-memory payloads share one buffer.
#[derive(Debug, Clone)]
pub enum Payload {
    Memory(Arc<[u8]>),
    File(PathBuf),
}

impl Payload {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Memory(Arc::from(bytes.into()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }

    /// Byte length when known without touching the filesystem.
    pub fn len_hint(&self) -> Option<u64> {
        match self {
            Self::Memory(bytes) => Some(bytes.len() as u64),
            Self::File(_) => None,
        }
    }
}

/// Display-only reference to a source's bytes, issued and released by a
/// preview registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PreviewHandle(String);

impl PreviewHandle {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One user-supplied file awaiting composition.
///
/// Position in the merge order is held by the containing list, never here.
#[derive(Debug, Clone)]
pub struct InputSource {
    id: SourceId,
    name: String,
    payload: Payload,
    media_kind: MediaKind,
    preview: PreviewHandle,
}

impl InputSource {
    pub fn new(
        id: SourceId,
        name: impl Into<String>,
        payload: Payload,
        media_kind: MediaKind,
        preview: PreviewHandle,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            payload,
            media_kind,
            preview,
        }
    }

    pub fn id(&self) -> &SourceId {
        &self.id
    }

    /// Original file name, for display.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn media_kind(&self) -> &MediaKind {
        &self.media_kind
    }

    pub fn preview(&self) -> &PreviewHandle {
        &self.preview
    }
}

/// Standard paper sizes for pages created from raster images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaperSize {
    A3,
    A4,
    A5,
    #[default]
    Letter,
    Legal,
    Tabloid,
    Custom { width_pt: u32, height_pt: u32 },
}

impl PaperSize {
    /// Dimensions in PDF points (width, height), portrait.
    pub fn dimensions_pt(&self) -> (f64, f64) {
        match self {
            Self::A3 => (841.89, 1190.55),
            Self::A4 => (595.28, 841.89),
            Self::A5 => (419.53, 595.28),
            Self::Letter => (612.0, 792.0),
            Self::Legal => (612.0, 1008.0),
            Self::Tabloid => (792.0, 1224.0),
            Self::Custom {
                width_pt,
                height_pt,
            } => (f64::from(*width_pt), f64::from(*height_pt)),
        }
    }
}

/// How many pages one source contributed to a merged document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceContribution {
    pub id: SourceId,
    pub kind: MediaKind,
    pub pages: usize,
}

/// The finished product of a composition: serialized bytes plus the page
/// breakdown per source, in merge order.
#[derive(Debug, Clone)]
pub struct OutputDocument {
    bytes: Vec<u8>,
    contributions: Vec<SourceContribution>,
}

impl OutputDocument {
    pub fn new(bytes: Vec<u8>, contributions: Vec<SourceContribution>) -> Self {
        Self {
            bytes,
            contributions,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Total pages in the merged document.
    pub fn page_count(&self) -> usize {
        self.contributions.iter().map(|c| c.pages).sum()
    }

    pub fn contributions(&self) -> &[SourceContribution] {
        &self.contributions
    }
}
