// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Preview handles — display-only references to a source's bytes.
//
// A host UI needs something it can point a thumbnail at. The registry that
// issues a handle owns whatever backs it and must be told exactly once when
// the handle is no longer needed.

use std::collections::HashMap;
use std::sync::Mutex;

use fusion_core::types::{Payload, PreviewHandle};
use tracing::{debug, warn};
use uuid::Uuid;

/// Issues and releases preview handles.
pub trait PreviewRegistry: Send + Sync {
    /// Create a handle for a newly acquired file.
    fn register(&self, file_name: &str, payload: &Payload) -> PreviewHandle;

    /// Release a handle previously returned by [`PreviewRegistry::register`].
    fn release(&self, handle: &PreviewHandle);
}

/// Keeps previewable payloads in memory, keyed by `preview:<uuid>` tokens.
#[derive(Default)]
pub struct InMemoryPreviews {
    live: Mutex<HashMap<PreviewHandle, Payload>>,
}

impl InMemoryPreviews {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the payload behind a live handle.
    pub fn resolve(&self, handle: &PreviewHandle) -> Option<Payload> {
        self.lock().get(handle).cloned()
    }

    /// Number of handles issued and not yet released.
    pub fn live_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<PreviewHandle, Payload>> {
        // The map stays consistent even if a holder panicked.
        self.live
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl PreviewRegistry for InMemoryPreviews {
    fn register(&self, file_name: &str, payload: &Payload) -> PreviewHandle {
        let handle = PreviewHandle::new(format!("preview:{}", Uuid::new_v4()));
        self.lock().insert(handle.clone(), payload.clone());
        debug!(%handle, file_name, "Preview registered");
        handle
    }

    fn release(&self, handle: &PreviewHandle) {
        if self.lock().remove(handle).is_some() {
            debug!(%handle, "Preview released");
        } else {
            warn!(%handle, "Release of unknown or already released preview");
        }
    }
}
