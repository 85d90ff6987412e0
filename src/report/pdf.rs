//! Paginated print output.

use super::layout::{
    BODY_FONT_PT, HEADING_FONT_PT, IMAGE_TOP_MM, IMAGE_WIDTH_MM, LINE_PITCH_MM, PAGE_HEIGHT_MM,
    PAGE_WIDTH_MM, Page, PrintLayout, SIDE_MARGIN_MM, TITLE_FONT_PT, TOP_MARGIN_MM, text_width_mm,
};
use crate::error::{ReportError, Result};
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfLayerReference,
};
use std::path::Path;

const IMAGE_DPI: f32 = 300.0;
const MM_PER_INCH: f32 = 25.4;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

/// Encodes `layout` as PDF bytes. Every exhibit image is read and decoded
/// up front; any failure aborts with [`ReportError::Assembly`].
pub fn write_pdf(layout: &PrintLayout) -> Result<Vec<u8>> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        super::layout::REPORT_TITLE,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let fonts = Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica)?,
        bold: doc.add_builtin_font(BuiltinFont::HelveticaBold)?,
    };

    for (index, page) in layout.pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) =
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            doc.get_page(page_index).get_layer(layer_index)
        };

        match page {
            Page::Text { title, lines } => write_text_page(&layer, &fonts, title.as_deref(), lines),
            Page::Exhibit { heading, image } => write_exhibit_page(&layer, &fonts, heading, image)?,
        }
    }

    Ok(doc.save_to_bytes()?)
}

fn write_text_page(layer: &PdfLayerReference, fonts: &Fonts, title: Option<&str>, lines: &[String]) {
    let mut y = PAGE_HEIGHT_MM - TOP_MARGIN_MM - LINE_PITCH_MM;

    if let Some(title) = title {
        let width = text_width_mm(title, TITLE_FONT_PT);
        let x = ((PAGE_WIDTH_MM - width) / 2.0).max(SIDE_MARGIN_MM);
        layer.use_text(title, TITLE_FONT_PT, Mm(x), Mm(y), &fonts.bold);
        y -= 2.0 * LINE_PITCH_MM;
    }

    for line in lines {
        if !line.is_empty() {
            layer.use_text(line.as_str(), BODY_FONT_PT, Mm(SIDE_MARGIN_MM), Mm(y), &fonts.regular);
        }
        y -= LINE_PITCH_MM;
    }
}

fn write_exhibit_page(
    layer: &PdfLayerReference,
    fonts: &Fonts,
    heading: &str,
    path: &Path,
) -> Result<()> {
    let bytes = std::fs::read(path).map_err(|e| {
        ReportError::Assembly(format!("cannot read exhibit {}: {e}", path.display()))
    })?;
    let decoded = image::load_from_memory(&bytes).map_err(|e| {
        ReportError::Assembly(format!("cannot decode exhibit {}: {e}", path.display()))
    })?;
    let rgb = image::DynamicImage::ImageRgb8(decoded.to_rgb8());

    layer.use_text(
        heading,
        HEADING_FONT_PT,
        Mm(SIDE_MARGIN_MM),
        Mm(PAGE_HEIGHT_MM - TOP_MARGIN_MM - LINE_PITCH_MM),
        &fonts.bold,
    );

    let native_width_mm = rgb.width() as f32 / IMAGE_DPI * MM_PER_INCH;
    let native_height_mm = rgb.height() as f32 / IMAGE_DPI * MM_PER_INCH;
    if native_width_mm <= 0.0 {
        return Err(ReportError::Assembly(format!(
            "exhibit {} has no pixels",
            path.display()
        )));
    }
    let scale = IMAGE_WIDTH_MM / native_width_mm;
    let bottom = PAGE_HEIGHT_MM - IMAGE_TOP_MM - native_height_mm * scale;

    Image::from_dynamic_image(&rgb).add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(SIDE_MARGIN_MM)),
            translate_y: Some(Mm(bottom)),
            scale_x: Some(scale),
            scale_y: Some(scale),
            dpi: Some(IMAGE_DPI),
            ..Default::default()
        },
    );
    Ok(())
}
