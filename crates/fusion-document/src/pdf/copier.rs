// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page copying between lopdf documents.
//
// Pages are copied together with every object they transitively reference
// (content streams, fonts, images, annotations). Each source object is copied
// at most once per donor, so resources shared between pages stay shared and
// reference cycles terminate.

use std::collections::HashMap;

use fusion_core::error::{FusionError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, warn};

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against malformed page trees whose /Parent chain loops.
const MAX_TREE_DEPTH: usize = 64;

/// Copies all pages of one donor document into a target document.
pub(crate) struct PageCopier<'a> {
    source: &'a Document,
    target: &'a mut Document,
    /// The target's /Pages node; copied pages hang directly off it.
    target_pages_id: ObjectId,
    /// Source object ID -> target object ID.
    id_map: HashMap<ObjectId, ObjectId>,
}

impl<'a> PageCopier<'a> {
    pub(crate) fn new(
        source: &'a Document,
        target: &'a mut Document,
        target_pages_id: ObjectId,
    ) -> Self {
        Self {
            source,
            target,
            target_pages_id,
            id_map: HashMap::new(),
        }
    }

    /// Copy every page of the source in page-tree order and return the new
    /// page IDs in that order. The caller links them into the target's
    /// /Kids array.
    pub(crate) fn copy_all_pages(mut self) -> Result<Vec<ObjectId>> {
        // BTreeMap keyed by 1-based page number, so iteration is page order.
        let source_pages = self.source.get_pages();

        // Reserve target IDs for all pages first, so links from one page to
        // another resolve to the copy instead of dragging in the source tree.
        let mut reserved = Vec::with_capacity(source_pages.len());
        for source_id in source_pages.values() {
            let target_id = self.target.new_object_id();
            self.id_map.insert(*source_id, target_id);
            reserved.push((*source_id, target_id));
        }

        for (source_id, target_id) in &reserved {
            let page = self.flattened_page(*source_id)?;
            let mut page = self.remap_dictionary(page);
            page.set("Parent", Object::Reference(self.target_pages_id));
            self.target
                .objects
                .insert(*target_id, Object::Dictionary(page));
        }

        debug!(
            pages = reserved.len(),
            objects = self.id_map.len(),
            "Donor pages copied"
        );
        Ok(reserved.into_iter().map(|(_, target_id)| target_id).collect())
    }

    /// The page dictionary with inherited attributes made explicit and its
    /// /Parent link removed.
    fn flattened_page(&self, page_id: ObjectId) -> Result<Dictionary> {
        let mut page = self
            .source
            .get_object(page_id)
            .and_then(Object::as_dict)
            .map_err(|err| {
                FusionError::PdfError(format!("cannot read page object {:?}: {}", page_id, err))
            })?
            .clone();

        for key in INHERITABLE {
            if !page.has(key)
                && let Some(value) = self.inherited_attribute(&page, key)
            {
                page.set(key.to_vec(), value);
            }
        }
        page.remove(b"Parent");
        Ok(page)
    }

    /// Walk up the /Parent chain looking for `key`.
    fn inherited_attribute(&self, page: &Dictionary, key: &[u8]) -> Option<Object> {
        let mut node = page;
        for _ in 0..MAX_TREE_DEPTH {
            let parent_id = node.get(b"Parent").and_then(Object::as_reference).ok()?;
            let parent = self
                .source
                .get_object(parent_id)
                .and_then(Object::as_dict)
                .ok()?;
            if let Ok(value) = parent.get(key) {
                return Some(value.clone());
            }
            node = parent;
        }
        None
    }

    /// Replace every reference inside `object` with a reference to a copy in
    /// the target document.
    fn remap(&mut self, object: Object) -> Object {
        match object {
            Object::Reference(id) => self.copy_reference(id),
            Object::Array(items) => {
                Object::Array(items.into_iter().map(|item| self.remap(item)).collect())
            }
            Object::Dictionary(dict) => Object::Dictionary(self.remap_dictionary(dict)),
            Object::Stream(mut stream) => {
                stream.dict = self.remap_dictionary(stream.dict);
                Object::Stream(stream)
            }
            other => other,
        }
    }

    fn remap_dictionary(&mut self, mut dict: Dictionary) -> Dictionary {
        for (_, value) in dict.iter_mut() {
            let original = std::mem::replace(value, Object::Null);
            *value = self.remap(original);
        }
        dict
    }

    fn copy_reference(&mut self, source_id: ObjectId) -> Object {
        if let Some(target_id) = self.id_map.get(&source_id) {
            return Object::Reference(*target_id);
        }

        let object = match self.source.get_object(source_id) {
            Ok(object) => object.clone(),
            Err(err) => {
                warn!(?source_id, %err, "Cannot resolve reference, using Null");
                return Object::Null;
            }
        };

        // Back-references into the donor's page tree (e.g. from annotations)
        // point at the target tree instead.
        if is_page_tree_node(&object) {
            return Object::Reference(self.target_pages_id);
        }

        // Map before recursing so cycles land on the reserved ID.
        let target_id = self.target.new_object_id();
        self.id_map.insert(source_id, target_id);
        let copied = self.remap(object);
        self.target.objects.insert(target_id, copied);
        Object::Reference(target_id)
    }
}

fn is_page_tree_node(object: &Object) -> bool {
    match object {
        Object::Dictionary(dict) => {
            matches!(dict.get(b"Type"), Ok(Object::Name(name)) if name.as_slice() == b"Pages")
        }
        _ => false,
    }
}
