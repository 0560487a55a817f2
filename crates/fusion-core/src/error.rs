// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for PDF Fusion.

use thiserror::Error;

use crate::types::{MediaKind, SourceId};

/// Top-level error type for all PDF Fusion operations.
#[derive(Debug, Error)]
pub enum FusionError {
    // -- Composition errors --
    #[error("could not read {id}: {reason}")]
    SourceReadFailure { id: SourceId, reason: String },

    #[error("unsupported file type for {id}: {kind}")]
    UnsupportedMediaKind { id: SourceId, kind: MediaKind },

    #[error("could not decode {id}: {reason}")]
    DecodeFailure { id: SourceId, reason: String },

    #[error("no input files to merge")]
    EmptyInputSet,

    #[error("a merge is already in progress")]
    MergeInProgress,

    // -- Ordering errors --
    #[error("cannot move from position {from} to {to} in a list of {len}")]
    InvalidMove { from: usize, to: usize, len: usize },

    // -- Document model errors --
    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Output / persistence --
    #[error("could not deliver merged document: {0}")]
    Output(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FusionError {
    /// The source a per-source error is about, if any.
    pub fn source_id(&self) -> Option<&SourceId> {
        match self {
            Self::SourceReadFailure { id, .. }
            | Self::UnsupportedMediaKind { id, .. }
            | Self::DecodeFailure { id, .. } => Some(id),
            _ => None,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FusionError>;
