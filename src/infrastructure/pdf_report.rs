// PDF report document - single A4 page with text lines and an embedded image
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use thiserror::Error;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const IMAGE_DPI: f32 = 300.0;
const MM_PER_INCH: f32 = 25.4;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("PDF document error: {0}")]
    Document(String),
    #[error("chart image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// A one-page document laid out in millimetres from the top-left corner
pub struct ReportDocument {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
}

impl ReportDocument {
    pub fn new(title: &str) -> Result<Self, ExportError> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Report");
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ExportError::Document(e.to_string()))?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self { doc, layer, font })
    }

    /// Baseline-anchored text at (`x`, `y`) millimetres
    pub fn text(&self, text: &str, font_size: f32, x: f32, y: f32) {
        self.layer
            .use_text(text, font_size, Mm(x), Mm(PAGE_HEIGHT_MM - y), &self.font);
    }

    /// Embed a PNG whose top-left corner sits at (`x`, `y`), scaled to
    /// `width` x `height` millimetres
    pub fn png_image(
        &self,
        png: &[u8],
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<(), ExportError> {
        let decoded = printpdf::image_crate::load_from_memory(png)?;
        let natural_width = decoded.width() as f32 / IMAGE_DPI * MM_PER_INCH;
        let natural_height = decoded.height() as f32 / IMAGE_DPI * MM_PER_INCH;
        if natural_width <= 0.0 || natural_height <= 0.0 {
            return Ok(());
        }

        Image::from_dynamic_image(&decoded).add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(x)),
                translate_y: Some(Mm(PAGE_HEIGHT_MM - y - height)),
                scale_x: Some(width / natural_width),
                scale_y: Some(height / natural_height),
                dpi: Some(IMAGE_DPI),
                ..Default::default()
            },
        );
        Ok(())
    }

    pub fn save(self, path: &Path) -> Result<(), ExportError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.doc
            .save(&mut writer)
            .map_err(|e| ExportError::Document(e.to_string()))
    }
}
