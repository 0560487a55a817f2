// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// fusion-document — Document composition for PDF Fusion.
//
// Provides the composer that merges PDFs and JPEG/PNG images into a single
// PDF, the document-model capability trait it drives, the fit-and-centre
// geometry for image pages, and the lopdf-backed production model.

pub mod composer;
pub mod geometry;
pub mod image;
pub mod model;
pub mod pdf;

// Re-export the primary types so callers can use `fusion_document::Composer` etc.
pub use composer::{ComposeState, Composer};
pub use geometry::{Placement, fit_and_center};
pub use model::{DocumentModel, EmbeddedRaster, PageFrame, RasterFormat};
pub use pdf::LopdfModel;
