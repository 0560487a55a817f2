// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Ordered source list — the user-controlled merge order.
//
// Position in this list is the merge position. Removing or clearing a
// source releases its preview handle exactly once.

use std::sync::Arc;

use fusion_core::error::{FusionError, Result};
use fusion_core::types::{InputSource, SourceId};
use tracing::{debug, warn};

use crate::preview::PreviewRegistry;

pub struct OrderedSources {
    items: Vec<InputSource>,
    previews: Arc<dyn PreviewRegistry>,
}

impl OrderedSources {
    pub fn new(previews: Arc<dyn PreviewRegistry>) -> Self {
        Self {
            items: Vec::new(),
            previews,
        }
    }

    /// Append sources to the end, in the order given.
    ///
    /// A source whose id is already present is skipped and its preview
    /// released, so the list never holds the same identity twice.
    pub fn append(&mut self, sources: impl IntoIterator<Item = InputSource>) {
        for source in sources {
            if self.position(source.id()).is_some() {
                warn!(id = %source.id(), "Duplicate source id ignored");
                self.previews.release(source.preview());
                continue;
            }
            debug!(id = %source.id(), position = self.items.len(), "Source appended");
            self.items.push(source);
        }
    }

    /// Remove the source with `id`. Absent ids are a no-op.
    pub fn remove(&mut self, id: &SourceId) -> Option<InputSource> {
        let index = self.position(id)?;
        let removed = self.items.remove(index);
        self.previews.release(removed.preview());
        debug!(id = %id, index, "Source removed");
        Some(removed)
    }

    /// Move the source at `from` so that it ends up at index `to`.
    ///
    /// The item is extracted first and then inserted, so `to` refers to the
    /// list as it is after extraction. Both indices must be in range.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.items.len();
        if from >= len || to >= len {
            return Err(FusionError::InvalidMove { from, to, len });
        }
        if from == to {
            return Ok(());
        }
        let item = self.items.remove(from);
        self.items.insert(to, item);
        debug!(from, to, "Source moved");
        Ok(())
    }

    /// Remove every source, releasing all preview handles.
    pub fn clear(&mut self) {
        for source in self.items.drain(..) {
            self.previews.release(source.preview());
        }
    }

    /// Independent copy of the current order; later edits do not affect it.
    pub fn snapshot(&self) -> Vec<InputSource> {
        self.items.clone()
    }

    /// Registry that issued the previews held by this list.
    pub fn previews(&self) -> &dyn PreviewRegistry {
        self.previews.as_ref()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputSource> {
        self.items.iter()
    }

    pub fn get(&self, id: &SourceId) -> Option<&InputSource> {
        self.items.iter().find(|s| s.id() == id)
    }

    pub fn position(&self, id: &SourceId) -> Option<usize> {
        self.items.iter().position(|s| s.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::InMemoryPreviews;
    use fusion_core::types::{MediaKind, Payload};

    fn sources(names: &[&str], previews: &InMemoryPreviews) -> Vec<InputSource> {
        names
            .iter()
            .map(|name| {
                let payload = Payload::from_bytes(name.as_bytes().to_vec());
                let preview = previews.register(name, &payload);
                InputSource::new(SourceId::new(*name), *name, payload, MediaKind::Pdf, preview)
            })
            .collect()
    }

    fn names(list: &OrderedSources) -> Vec<String> {
        list.iter().map(|s| s.name().to_string()).collect()
    }

    fn setup(names: &[&str]) -> (Arc<InMemoryPreviews>, OrderedSources) {
        let previews = Arc::new(InMemoryPreviews::new());
        let mut list = OrderedSources::new(previews.clone());
        list.append(sources(names, &previews));
        (previews, list)
    }

    #[test]
    fn move_extracts_then_inserts() {
        let (_, mut list) = setup(&["A", "B", "C", "D"]);
        list.move_item(0, 2).unwrap();
        assert_eq!(names(&list), ["B", "C", "A", "D"]);

        list.move_item(3, 0).unwrap();
        assert_eq!(names(&list), ["D", "B", "C", "A"]);
    }

    #[test]
    fn move_to_same_index_is_noop() {
        let (_, mut list) = setup(&["A", "B", "C"]);
        list.move_item(1, 1).unwrap();
        assert_eq!(names(&list), ["A", "B", "C"]);
    }

    #[test]
    fn out_of_range_move_is_rejected_and_list_unchanged() {
        let (_, mut list) = setup(&["A", "B"]);
        let err = list.move_item(0, 2).unwrap_err();
        assert!(matches!(err, FusionError::InvalidMove { from: 0, to: 2, len: 2 }));
        assert!(list.move_item(5, 0).is_err());
        assert_eq!(names(&list), ["A", "B"]);
    }

    #[test]
    fn every_move_is_a_permutation() {
        let base = ["A", "B", "C", "D", "E"];
        for from in 0..base.len() {
            for to in 0..base.len() {
                let (_, mut list) = setup(&base);
                list.move_item(from, to).unwrap();

                let after = names(&list);
                let mut sorted = after.clone();
                sorted.sort();
                assert_eq!(sorted, base, "move({from}, {to}) lost or duplicated items");
                assert_eq!(after[to], base[from]);
            }
        }
    }

    #[test]
    fn remove_releases_preview_once() {
        let (previews, mut list) = setup(&["A", "B", "C"]);
        assert_eq!(previews.live_count(), 3);

        let removed = list.remove(&SourceId::new("B")).unwrap();
        assert_eq!(removed.name(), "B");
        assert_eq!(names(&list), ["A", "C"]);
        assert_eq!(previews.live_count(), 2);

        assert!(list.remove(&SourceId::new("B")).is_none());
        assert_eq!(previews.live_count(), 2);
    }

    #[test]
    fn lookup_by_identity_tracks_moves() {
        let (_, mut list) = setup(&["A", "B", "C"]);
        list.move_item(0, 2).unwrap();

        let c = SourceId::new("C");
        assert_eq!(list.get(&c).map(InputSource::name), Some("C"));
        assert_eq!(list.position(&c), Some(1));
        assert_eq!(list.position(&SourceId::new("A")), Some(2));
        assert!(list.get(&SourceId::new("Z")).is_none());
    }

    #[test]
    fn clear_releases_everything() {
        let (previews, mut list) = setup(&["A", "B", "C"]);
        list.clear();
        assert!(list.is_empty());
        assert_eq!(previews.live_count(), 0);
    }

    #[test]
    fn duplicate_ids_are_skipped() {
        let (previews, mut list) = setup(&["A", "B"]);
        list.append(sources(&["A"], &previews));
        assert_eq!(names(&list), ["A", "B"]);
        assert_eq!(previews.live_count(), 2);
    }

    #[test]
    fn snapshot_is_isolated_from_later_edits() {
        let (_, mut list) = setup(&["A", "B", "C"]);
        let snapshot = list.snapshot();
        list.move_item(2, 0).unwrap();
        list.remove(&SourceId::new("A"));

        let snap_names: Vec<&str> = snapshot.iter().map(|s| s.name()).collect();
        assert_eq!(snap_names, ["A", "B", "C"]);
        assert_eq!(names(&list), ["C", "B"]);
    }
}
