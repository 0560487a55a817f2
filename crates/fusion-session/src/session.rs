// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Merge session — the entry point a host UI drives.
//
// Holds the ordered sources, the composer and the displayed status. The
// session is cheap to clone; clones share state, so one task can keep
// reordering while another runs a merge. A merge works on a snapshot taken
// when it starts, so edits made meanwhile only affect the next merge.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use fusion_core::FusionConfig;
use fusion_core::error::{FusionError, Result};
use fusion_core::human_errors::{HumanError, humanize_error};
use fusion_core::types::{InputSource, OutputDocument, SourceId};
use fusion_document::{Composer, DocumentModel, LopdfModel};
use tracing::{info, instrument, warn};

use crate::intake::{IncomingFile, accept};
use crate::ordering::OrderedSources;
use crate::output::{OutputSink, output_file_name};
use crate::preview::PreviewRegistry;

/// What the session is doing, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeStage {
    #[default]
    Idle,
    Merging,
    Complete,
    Failed,
}

impl fmt::Display for MergeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::Merging => "merging",
            Self::Complete => "complete",
            Self::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// A merged document together with the name it was delivered under.
#[derive(Debug, Clone)]
pub struct MergedFile {
    pub file_name: String,
    pub document: OutputDocument,
}

#[derive(Debug, Default)]
struct Status {
    stage: MergeStage,
    last_error: Option<HumanError>,
}

struct Inner<M> {
    sources: Mutex<OrderedSources>,
    status: Mutex<Status>,
    composer: Composer<M>,
    config: FusionConfig,
}

pub struct MergeSession<M = LopdfModel> {
    inner: Arc<Inner<M>>,
}

impl<M> Clone for MergeSession<M> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl MergeSession<LopdfModel> {
    /// Session backed by lopdf, configured from `config`.
    pub fn with_config(config: FusionConfig, previews: Arc<dyn PreviewRegistry>) -> Self {
        let model = LopdfModel::from_config(&config);
        Self::new(model, config, previews)
    }
}

impl<M: DocumentModel> MergeSession<M> {
    pub fn new(model: M, config: FusionConfig, previews: Arc<dyn PreviewRegistry>) -> Self {
        Self {
            inner: Arc::new(Inner {
                sources: Mutex::new(OrderedSources::new(previews)),
                status: Mutex::new(Status::default()),
                composer: Composer::new(model),
                config,
            }),
        }
    }

    pub fn config(&self) -> &FusionConfig {
        &self.inner.config
    }

    /// Accept a batch of files, append the supported ones, and return their
    /// new identities in order.
    pub fn add_files(&self, batch: impl IntoIterator<Item = IncomingFile>) -> Vec<SourceId> {
        let mut sources = self.ordered();
        let accepted = accept(batch, sources.previews());
        let ids: Vec<SourceId> = accepted.iter().map(|s| s.id().clone()).collect();
        sources.append(accepted);
        let total = sources.len();
        drop(sources);

        self.status().last_error = None;
        info!(added = ids.len(), total, "Files added");
        ids
    }

    pub fn remove(&self, id: &SourceId) -> Option<InputSource> {
        self.ordered().remove(id)
    }

    pub fn move_source(&self, from: usize, to: usize) -> Result<()> {
        self.ordered().move_item(from, to)
    }

    pub fn clear(&self) {
        self.ordered().clear();
    }

    /// Current merge order.
    pub fn sources(&self) -> Vec<InputSource> {
        self.ordered().snapshot()
    }

    pub fn stage(&self) -> MergeStage {
        self.status().stage
    }

    /// Message shown to the user after the last failed action, if any.
    /// Failures caused by one file name that file.
    pub fn last_error(&self) -> Option<String> {
        self.status().last_error.as_ref().map(|e| e.message.clone())
    }

    /// The full human-readable form of the last failure, including what to
    /// try next.
    pub fn last_error_details(&self) -> Option<HumanError> {
        self.status().last_error.clone()
    }

    /// Merge the current sources and hand the result to `sink`.
    #[instrument(skip_all)]
    pub async fn merge(&self, sink: &dyn OutputSink) -> Result<MergedFile> {
        // Lock order: status, then sources.
        let snapshot = {
            let mut status = self.status();
            if status.stage == MergeStage::Merging {
                return Err(FusionError::MergeInProgress);
            }
            let snapshot = self.sources();
            if snapshot.is_empty() {
                let err = FusionError::EmptyInputSet;
                status.last_error = Some(humanize_error(&err));
                return Err(err);
            }
            status.stage = MergeStage::Merging;
            snapshot
        };

        let guard = MergingGuard { session: self };
        info!(sources = snapshot.len(), "Merge started");
        let outcome = self.compose_and_deliver(&snapshot, sink).await;
        guard.finish(&snapshot, &outcome);
        outcome
    }

    async fn compose_and_deliver(
        &self,
        snapshot: &[InputSource],
        sink: &dyn OutputSink,
    ) -> Result<MergedFile> {
        let document = self.inner.composer.compose(snapshot).await?;
        let file_name = output_file_name(&self.inner.config.output_prefix, Utc::now());
        sink.deliver(&file_name, &document)?;
        Ok(MergedFile {
            file_name,
            document,
        })
    }

    fn ordered(&self) -> MutexGuard<'_, OrderedSources> {
        self.inner
            .sources
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn status(&self) -> MutexGuard<'_, Status> {
        self.inner
            .status
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Returns the session to `Idle` if a merge future is dropped before it
/// finishes, so a cancelled merge never blocks the next one.
struct MergingGuard<'a, M: DocumentModel> {
    session: &'a MergeSession<M>,
}

impl<M: DocumentModel> MergingGuard<'_, M> {
    fn finish(self, snapshot: &[InputSource], outcome: &Result<MergedFile>) {
        let mut status = self.session.status();
        match outcome {
            Ok(merged) => {
                status.stage = MergeStage::Complete;
                status.last_error = None;
                info!(
                    file = %merged.file_name,
                    pages = merged.document.page_count(),
                    "Merge complete"
                );
            }
            Err(err) => {
                status.stage = MergeStage::Failed;
                status.last_error = Some(describe_failure(err, snapshot));
                warn!(%err, "Merge failed");
            }
        }
    }
}

/// Humanize `err`, prefixing the message with the offending file's name
/// when the failure belongs to one source.
fn describe_failure(err: &FusionError, snapshot: &[InputSource]) -> HumanError {
    let mut human = humanize_error(err);
    if let Some(id) = err.source_id()
        && let Some(source) = snapshot.iter().find(|s| s.id() == id)
    {
        human.message = format!("{}: {}", source.name(), human.message);
    }
    human
}

impl<M: DocumentModel> Drop for MergingGuard<'_, M> {
    fn drop(&mut self) {
        let mut status = self.session.status();
        if status.stage == MergeStage::Merging {
            warn!("Merge cancelled before completion");
            status.stage = MergeStage::Idle;
        }
    }
}
