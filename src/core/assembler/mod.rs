//! # Assembler Module
//!
//! Concatenates page images into a single PDF using `printpdf` 0.8.
//!
//! Pages are taken in scanner order (the same walk the splitter uses), one
//! image per page. Each page is sized to its image at 72 DPI, so one pixel
//! maps to one PDF point and nothing is rescaled.

use crate::core::decode::decode_file;
use crate::core::scanner::{ImageScanner, ScanConfig, WalkDirScanner};
use crate::error::AssembleError;
use crate::events::{null_sender, AssembleEvent, Event, EventSender};
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// File name of the assembled document
pub const MERGED_PDF_NAME: &str = "merged.pdf";

const PAGE_DPI: f32 = 72.0;

const DOCUMENT_TITLE: &str = "Merged Pages";

/// Builds `merged.pdf` from the images in a directory
pub struct PdfAssembler {
    scan_config: ScanConfig,
}

impl PdfAssembler {
    pub fn new(scan_config: ScanConfig) -> Self {
        Self { scan_config }
    }

    /// Assemble without events
    pub fn assemble(&self, directory: &Path) -> Result<Option<PathBuf>, AssembleError> {
        self.assemble_with_events(directory, &null_sender())
    }

    /// Write `<directory>/merged.pdf` from every image in `directory`.
    ///
    /// Returns `None` and writes nothing when the directory holds no images.
    #[instrument(skip_all, fields(directory = %directory.display()))]
    pub fn assemble_with_events(
        &self,
        directory: &Path,
        events: &EventSender,
    ) -> Result<Option<PathBuf>, AssembleError> {
        let scanner = WalkDirScanner::new(self.scan_config.clone());
        let images = scanner.scan(&[directory.to_path_buf()])?.into_strict()?;

        events.send(Event::Assemble(AssembleEvent::Started {
            total_pages: images.len(),
        }));

        if images.is_empty() {
            info!("No page images found, skipping PDF");
            events.send(Event::Assemble(AssembleEvent::Completed {
                output: None,
                pages: 0,
            }));
            return Ok(None);
        }

        let mut doc = PdfDocument::new(DOCUMENT_TITLE);
        let mut pages = Vec::with_capacity(images.len());

        for (index, image) in images.iter().enumerate() {
            let rgb = decode_file(&image.path)?.to_rgb8();
            let (width, height) = rgb.dimensions();

            let raw = RawImage {
                pixels: RawImageData::U8(rgb.into_raw()),
                width: width as usize,
                height: height as usize,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            };
            let xobject_id = doc.add_image(&raw);

            let ops = vec![Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt(0.0)),
                    translate_y: Some(Pt(0.0)),
                    scale_x: None,
                    scale_y: None,
                    dpi: Some(PAGE_DPI),
                    rotate: None,
                },
            }];
            pages.push(PdfPage::new(
                pixels_to_mm(width),
                pixels_to_mm(height),
                ops,
            ));

            debug!(path = %image.path.display(), width, height, "Page added");
            events.send(Event::Assemble(AssembleEvent::PageAdded {
                path: image.path.clone(),
                page_number: index + 1,
            }));
        }

        let page_count = pages.len();
        doc.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            warn!(count = warnings.len(), "PDF serialisation produced warnings");
        }

        let output = directory.join(MERGED_PDF_NAME);
        fs::write(&output, &bytes).map_err(|source| AssembleError::Write {
            path: output.clone(),
            source,
        })?;

        info!(pages = page_count, path = %output.display(), "Wrote merged PDF");
        events.send(Event::Assemble(AssembleEvent::Completed {
            output: Some(output.clone()),
            pages: page_count,
        }));

        Ok(Some(output))
    }
}

impl Default for PdfAssembler {
    fn default() -> Self {
        Self::new(ScanConfig::default())
    }
}

fn pixels_to_mm(pixels: u32) -> Mm {
    Mm(pixels as f32 / PAGE_DPI * 25.4)
}
