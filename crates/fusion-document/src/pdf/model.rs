// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// lopdf-backed document model.
//
// The output document is built as a flat page tree: one /Pages node whose
// /Kids are filled in at serialisation time, in the order pages were added.

use fusion_core::error::{FusionError, Result};
use fusion_core::{FusionConfig, PaperSize};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use tracing::{debug, info, instrument};

use crate::geometry::Placement;
use crate::image::raster;
use crate::model::{DocumentModel, EmbeddedRaster, PageFrame, RasterFormat};
use crate::pdf::copier::PageCopier;

/// Production [`DocumentModel`] built on `lopdf`, `image`, and `flate2`.
#[derive(Debug, Clone)]
pub struct LopdfModel {
    /// Geometry of pages created by [`DocumentModel::add_page`].
    page_size: PaperSize,
    pdf_version: String,
    compress: bool,
}

/// An output document under construction.
pub struct LopdfDocument {
    document: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
    /// Counter for unique XObject resource names.
    next_image: usize,
}

impl LopdfDocument {
    /// Pages added so far.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }
}

/// A parsed donor PDF.
pub struct LopdfDonor {
    document: Document,
}

impl LopdfDonor {
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }
}

/// An image XObject living in one output document.
#[derive(Debug, Clone, Copy)]
pub struct LopdfRaster {
    id: ObjectId,
}

impl LopdfModel {
    pub fn new(page_size: PaperSize) -> Self {
        Self {
            page_size,
            pdf_version: "1.7".to_string(),
            compress: true,
        }
    }

    /// Model matching the merge settings in `config`.
    pub fn from_config(config: &FusionConfig) -> Self {
        Self {
            page_size: config.page_size,
            pdf_version: config.pdf_version.clone(),
            compress: config.compress_output,
        }
    }

    pub fn page_size(&self) -> PaperSize {
        self.page_size
    }
}

impl Default for LopdfModel {
    fn default() -> Self {
        Self::new(PaperSize::default())
    }
}

impl DocumentModel for LopdfModel {
    type Document = LopdfDocument;
    type Donor = LopdfDonor;
    type Raster = LopdfRaster;

    fn create_document(&self) -> Result<LopdfDocument> {
        let mut document = Document::with_version(self.pdf_version.as_str());
        let pages_id = document.new_object_id();
        document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => Vec::<Object>::new(),
                "Count" => 0,
            }),
        );

        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);

        let info_id = document.add_object(dictionary! {
            "Producer" => Object::string_literal("PDF Fusion"),
        });
        document.trailer.set("Info", info_id);

        Ok(LopdfDocument {
            document,
            pages_id,
            page_ids: Vec::new(),
            next_image: 0,
        })
    }

    #[instrument(skip_all, fields(bytes_len = bytes.len()))]
    fn load_donor(&self, bytes: &[u8]) -> Result<LopdfDonor> {
        let document = Document::load_mem(bytes).map_err(|err| {
            FusionError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;

        if document.is_encrypted() {
            return Err(FusionError::PdfError(
                "encrypted PDFs are not supported".to_string(),
            ));
        }

        debug!(pages = document.get_pages().len(), "Donor PDF loaded");
        Ok(LopdfDonor { document })
    }

    fn copy_donor_pages(&self, doc: &mut LopdfDocument, donor: &LopdfDonor) -> Result<usize> {
        let copier = PageCopier::new(&donor.document, &mut doc.document, doc.pages_id);
        let copied = copier.copy_all_pages()?;
        let count = copied.len();
        doc.page_ids.extend(copied);
        Ok(count)
    }

    fn embed_raster(
        &self,
        doc: &mut LopdfDocument,
        format: RasterFormat,
        bytes: &[u8],
    ) -> Result<EmbeddedRaster<LopdfRaster>> {
        let raster::RasterImage {
            width,
            height,
            mut image,
            soft_mask,
        } = raster::encode(format, bytes)?;

        if let Some(mask) = soft_mask {
            let mask_id = doc.document.add_object(mask);
            image.dict.set("SMask", mask_id);
        }
        let id = doc.document.add_object(image);

        Ok(EmbeddedRaster {
            handle: LopdfRaster { id },
            width,
            height,
        })
    }

    fn add_page(&self, doc: &mut LopdfDocument) -> Result<PageFrame> {
        let (width, height) = self.page_size.dimensions_pt();
        let media_box: Vec<Object> = [0.0, 0.0, width, height]
            .into_iter()
            .map(|v| Object::Real(v as f32))
            .collect();

        let page_id = doc.document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => doc.pages_id,
            "MediaBox" => media_box,
            "Resources" => Dictionary::new(),
        });
        doc.page_ids.push(page_id);

        Ok(PageFrame {
            index: doc.page_ids.len() - 1,
            width,
            height,
        })
    }

    fn draw_raster(
        &self,
        doc: &mut LopdfDocument,
        page: &PageFrame,
        raster: &LopdfRaster,
        placement: &Placement,
    ) -> Result<()> {
        let page_id = *doc.page_ids.get(page.index).ok_or_else(|| {
            FusionError::PdfError(format!("page {} does not exist", page.index))
        })?;

        let name = format!("Im{}", doc.next_image);
        doc.next_image += 1;

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        Object::Real(placement.width as f32),
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Real(placement.height as f32),
                        Object::Real(placement.x as f32),
                        Object::Real(placement.y as f32),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(name.clone().into_bytes())]),
                Operation::new("Q", vec![]),
            ],
        };
        let encoded = content.encode().map_err(|err| {
            FusionError::PdfError(format!("failed to encode page content: {}", err))
        })?;
        let content_id = doc.document.add_object(Stream::new(Dictionary::new(), encoded));

        let mut xobjects = Dictionary::new();
        xobjects.set(name, raster.id);

        let page_dict = doc
            .document
            .get_object_mut(page_id)
            .and_then(Object::as_dict_mut)
            .map_err(|err| FusionError::PdfError(format!("cannot update page: {}", err)))?;
        page_dict.set("Contents", content_id);
        page_dict.set("Resources", dictionary! { "XObject" => xobjects });

        debug!(
            page = page.index,
            scale = placement.scale,
            x = placement.x,
            y = placement.y,
            "Image placed on page"
        );
        Ok(())
    }

    fn serialize(&self, mut doc: LopdfDocument) -> Result<Vec<u8>> {
        let kids: Vec<Object> = doc.page_ids.iter().map(|id| Object::Reference(*id)).collect();
        let count = kids.len() as i64;

        let pages = doc
            .document
            .get_object_mut(doc.pages_id)
            .and_then(Object::as_dict_mut)
            .map_err(|err| FusionError::PdfError(format!("no /Pages: {}", err)))?;
        pages.set("Kids", kids);
        pages.set("Count", count);

        if self.compress {
            doc.document.compress();
        }

        let mut output = Vec::new();
        doc.document.save_to(&mut output).map_err(|err| {
            FusionError::PdfError(format!("failed to serialise merged PDF: {}", err))
        })?;

        info!(pages = count, output_bytes = output.len(), "Merged PDF serialised");
        Ok(output)
    }
}
