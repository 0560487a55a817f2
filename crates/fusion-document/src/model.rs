// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document-model capability interface.
//
// The composer never touches PDF structure directly. Everything it needs
// from a PDF library goes through this trait, so composition logic can be
// exercised against an in-memory fake.

use fusion_core::error::Result;

use crate::geometry::Placement;

/// Raster formats the model can embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    Jpeg,
    Png,
}

/// An embedded image together with its native pixel size.
#[derive(Debug, Clone)]
pub struct EmbeddedRaster<R> {
    pub handle: R,
    pub width: u32,
    pub height: u32,
}

/// A freshly created blank page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageFrame {
    /// Zero-based position in the output document.
    pub index: usize,
    pub width: f64,
    pub height: f64,
}

/// Operations the composer needs from a document library.
///
/// Page geometry for [`DocumentModel::add_page`] belongs to the model, not to
/// the caller. Decode errors from [`DocumentModel::load_donor`] and
/// [`DocumentModel::embed_raster`] are reported as `PdfError` / `ImageError`;
/// the composer attributes them to a source.
pub trait DocumentModel: Send + Sync {
    /// The output accumulator.
    type Document: Send;
    /// A parsed source PDF.
    type Donor: Send;
    /// An image embedded in a specific output document.
    type Raster: Send;

    /// Create an empty output document.
    fn create_document(&self) -> Result<Self::Document>;

    /// Parse PDF bytes into a donor document.
    fn load_donor(&self, bytes: &[u8]) -> Result<Self::Donor>;

    /// Copy every page of `donor`, in its own order, to the end of `doc`.
    /// Returns the number of pages copied.
    fn copy_donor_pages(&self, doc: &mut Self::Document, donor: &Self::Donor) -> Result<usize>;

    /// Embed encoded image bytes into `doc`, reporting native pixel size.
    fn embed_raster(
        &self,
        doc: &mut Self::Document,
        format: RasterFormat,
        bytes: &[u8],
    ) -> Result<EmbeddedRaster<Self::Raster>>;

    /// Append one blank page of the model's default geometry.
    fn add_page(&self, doc: &mut Self::Document) -> Result<PageFrame>;

    /// Draw an embedded raster on a page created by [`DocumentModel::add_page`].
    fn draw_raster(
        &self,
        doc: &mut Self::Document,
        page: &PageFrame,
        raster: &Self::Raster,
        placement: &Placement,
    ) -> Result<()>;

    /// Finalise `doc` into PDF bytes.
    fn serialize(&self, doc: Self::Document) -> Result<Vec<u8>>;
}
