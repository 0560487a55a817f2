// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document composer — turns an ordered list of input sources into one PDF.
//
// Sources are processed strictly one after another: source N+1 is not read
// until every page of source N has been appended. That sequencing is what
// keeps the output page order equal to the input order. Any failure discards
// the partially built document; callers never see a partial merge.

use std::fmt;
use std::sync::Arc;

use fusion_core::error::{FusionError, Result};
use fusion_core::types::{InputSource, MediaKind, OutputDocument, Payload, SourceContribution};
use tracing::{debug, info, instrument, warn};

use crate::geometry::fit_and_center;
use crate::model::{DocumentModel, RasterFormat};

/// Lifecycle of a single composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeState {
    Idle,
    Running,
    Succeeded,
    Failed,
}

impl fmt::Display for ComposeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Merges input sources through an injected [`DocumentModel`].
///
/// Each call to [`Composer::compose`] is an independent composition that
/// starts from an empty document; nothing carries over between calls.
pub struct Composer<M> {
    model: M,
}

impl<M: DocumentModel> Composer<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Compose `sources`, in order, into a single PDF.
    ///
    /// Fails with `EmptyInputSet` before doing any work when `sources` is
    /// empty, and otherwise with the first error any source produces.
    #[instrument(skip_all, fields(sources = sources.len()))]
    pub async fn compose(&self, sources: &[InputSource]) -> Result<OutputDocument> {
        if sources.is_empty() {
            return Err(FusionError::EmptyInputSet);
        }

        info!(state = %ComposeState::Running, "Composing merged PDF");
        let outcome = self.run(sources).await;

        match &outcome {
            Ok(output) => info!(
                state = %ComposeState::Succeeded,
                pages = output.page_count(),
                output_bytes = output.len(),
                "Composition complete"
            ),
            Err(err) => warn!(state = %ComposeState::Failed, %err, "Composition aborted"),
        }
        outcome
    }

    async fn run(&self, sources: &[InputSource]) -> Result<OutputDocument> {
        let mut doc = self.model.create_document()?;
        let mut contributions = Vec::with_capacity(sources.len());

        for (position, source) in sources.iter().enumerate() {
            let bytes = read_payload(source).await?;

            let pages = match source.media_kind() {
                MediaKind::Pdf => self.append_pdf(&mut doc, source, &bytes)?,
                MediaKind::Jpeg => self.append_raster(&mut doc, source, RasterFormat::Jpeg, &bytes)?,
                MediaKind::Png => self.append_raster(&mut doc, source, RasterFormat::Png, &bytes)?,
                MediaKind::Other(_) => {
                    return Err(FusionError::UnsupportedMediaKind {
                        id: source.id().clone(),
                        kind: source.media_kind().clone(),
                    });
                }
            };

            debug!(position, id = %source.id(), kind = %source.media_kind(), pages, "Source appended");
            contributions.push(SourceContribution {
                id: source.id().clone(),
                kind: source.media_kind().clone(),
                pages,
            });

            // Let other tasks (e.g. a reorder from the UI) run between sources.
            tokio::task::yield_now().await;
        }

        let bytes = self.model.serialize(doc)?;
        Ok(OutputDocument::new(bytes, contributions))
    }

    fn append_pdf(&self, doc: &mut M::Document, source: &InputSource, bytes: &[u8]) -> Result<usize> {
        let donor = self
            .model
            .load_donor(bytes)
            .map_err(|err| decode_failure(source, err))?;
        self.model
            .copy_donor_pages(doc, &donor)
            .map_err(|err| decode_failure(source, err))
    }

    fn append_raster(
        &self,
        doc: &mut M::Document,
        source: &InputSource,
        format: RasterFormat,
        bytes: &[u8],
    ) -> Result<usize> {
        let raster = self
            .model
            .embed_raster(doc, format, bytes)
            .map_err(|err| decode_failure(source, err))?;

        let page = self.model.add_page(doc)?;
        let placement = fit_and_center(page.width, page.height, raster.width, raster.height)
            .ok_or_else(|| FusionError::DecodeFailure {
                id: source.id().clone(),
                reason: format!(
                    "cannot place a {}x{} image on a {}x{}pt page",
                    raster.width, raster.height, page.width, page.height
                ),
            })?;

        self.model.draw_raster(doc, &page, &raster.handle, &placement)?;
        Ok(1)
    }
}

async fn read_payload(source: &InputSource) -> Result<Arc<[u8]>> {
    match source.payload() {
        Payload::Memory(bytes) => Ok(Arc::clone(bytes)),
        Payload::File(path) => tokio::fs::read(path)
            .await
            .map(Arc::from)
            .map_err(|err| FusionError::SourceReadFailure {
                id: source.id().clone(),
                reason: format!("{}: {}", path.display(), err),
            }),
    }
}

fn decode_failure(source: &InputSource, err: FusionError) -> FusionError {
    FusionError::DecodeFailure {
        id: source.id().clone(),
        reason: err.to_string(),
    }
}
