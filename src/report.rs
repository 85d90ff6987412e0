//! Report synthesis: report text plus rendered exhibits in, one document out.
//!
//! Layout is computed first ([`layout`]) and then encoded by the writer for
//! the requested [`ReportFormat`]. The print format gets a title page with
//! the text and one page per exhibit. The flow format gets a heading and the
//! text as a single paragraph, without images.

pub mod docx;
pub mod layout;
pub mod pdf;

pub use layout::{FlowLayout, Page, PrintLayout};

use crate::charts::VisualizationArtifact;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Pdf,
    Docx,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }

    pub fn file_name(self) -> String {
        format!("EDA_Report.{}", self.extension())
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A fully materialised document.
#[derive(Clone, Debug)]
pub struct RenderedReport {
    pub format: ReportFormat,
    pub bytes: Vec<u8>,
}

impl RenderedReport {
    pub fn file_name(&self) -> String {
        self.format.file_name()
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

pub fn synthesize(
    text: &str,
    artifacts: &[VisualizationArtifact],
    format: ReportFormat,
) -> Result<RenderedReport> {
    let bytes = match format {
        ReportFormat::Pdf => {
            let layout = PrintLayout::build(text, artifacts);
            info!("Assembling PDF with {} page(s)", layout.page_count());
            pdf::write_pdf(&layout)?
        }
        ReportFormat::Docx => {
            info!("Assembling DOCX ({} exhibit(s) not embedded)", artifacts.len());
            docx::write_docx(&FlowLayout::build(text))?
        }
    };
    Ok(RenderedReport { format, bytes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportError;
    use anyhow::Result;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::path::Path;

    fn png_artifact(dir: &Path, name: &str) -> Result<VisualizationArtifact> {
        let path = dir.join(format!("{name}.png"));
        let image = RgbImage::from_pixel(80, 40, Rgb([200, 30, 30]));
        image.save_with_format(&path, ImageFormat::Png)?;
        Ok(VisualizationArtifact {
            name: name.to_owned(),
            png: std::fs::read(&path)?,
            path,
        })
    }

    /// Page objects in the serialized document (`/Type /Page`, not `/Pages`).
    fn pdf_page_count(bytes: &[u8]) -> usize {
        let mut count = 0;
        let mut rest = bytes;
        while let Some(pos) = rest.windows(5).position(|w| w == b"/Type") {
            rest = &rest[pos + 5..];
            let value = rest.trim_ascii_start();
            if let Some(after) = value.strip_prefix(b"/Page")
                && !after.first().is_some_and(u8::is_ascii_alphanumeric)
            {
                count += 1;
            }
        }
        count
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_format_metadata() -> Result<()> {
        assert_eq!(ReportFormat::Pdf.file_name(), "EDA_Report.pdf");
        assert_eq!(ReportFormat::Docx.file_name(), "EDA_Report.docx");
        assert_eq!(ReportFormat::Pdf.mime_type(), "application/pdf");
        assert!(ReportFormat::Docx.mime_type().contains("wordprocessingml"));
        assert_eq!(ReportFormat::default(), ReportFormat::Pdf);
        assert_eq!(serde_json::to_string(&ReportFormat::Docx)?, "\"docx\"");
        Ok(())
    }

    #[test]
    fn test_pdf_with_exhibits() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let artifacts = vec![
            png_artifact(dir.path(), "hist_amount")?,
            png_artifact(dir.path(), "countplot_region")?,
        ];
        let text = "The dataset contains 3 rows and 3 columns.";
        let report = synthesize(text, &artifacts, ReportFormat::Pdf)?;

        assert!(report.bytes.starts_with(b"%PDF"));
        assert_eq!(report.file_name(), "EDA_Report.pdf");
        assert_eq!(PrintLayout::build(text, &artifacts).page_count(), 3);
        assert_eq!(pdf_page_count(&report.bytes), 3);
        Ok(())
    }

    #[test]
    fn test_pdf_page_count_follows_text_length() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let artifacts = vec![png_artifact(dir.path(), "hist_amount")?];
        let text = (0..100)
            .map(|i| format!("- column_{i}: 3 unique values"))
            .collect::<Vec<_>>()
            .join("\n");

        let layout = PrintLayout::build(&text, &artifacts);
        assert!(layout.text_pages() > 1);

        let report = synthesize(&text, &artifacts, ReportFormat::Pdf)?;
        assert_eq!(pdf_page_count(&report.bytes), layout.page_count());
        Ok(())
    }

    #[test]
    fn test_pdf_fails_on_unreadable_artifact() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let missing = VisualizationArtifact {
            name: "gone".to_owned(),
            png: Vec::new(),
            path: dir.path().join("gone.png"),
        };
        let result = synthesize("text", &[missing], ReportFormat::Pdf);
        assert!(matches!(result, Err(ReportError::Assembly(_))));

        let corrupt = dir.path().join("corrupt.png");
        std::fs::write(&corrupt, b"not an image")?;
        let corrupt = VisualizationArtifact {
            name: "corrupt".to_owned(),
            png: Vec::new(),
            path: corrupt,
        };
        let result = synthesize("text", &[corrupt], ReportFormat::Pdf);
        assert!(matches!(result, Err(ReportError::Assembly(_))));
        Ok(())
    }

    #[test]
    fn test_docx_ignores_exhibits() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let missing = VisualizationArtifact {
            name: "never_read".to_owned(),
            png: Vec::new(),
            path: dir.path().join("never_read.png"),
        };
        let report = synthesize("line one\nline two", &[missing], ReportFormat::Docx)?;
        assert!(report.bytes.starts_with(b"PK"));
        assert_eq!(report.file_name(), "EDA_Report.docx");
        assert!(contains(&report.bytes, b"word/document.xml"));
        assert!(!contains(&report.bytes, b"word/media/"));
        Ok(())
    }

    #[test]
    fn test_docx_is_heading_plus_one_paragraph() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let artifacts = vec![png_artifact(dir.path(), "hist_amount")?];
        let report = synthesize("line one\n\nline three", &artifacts, ReportFormat::Docx)?;
        assert!(!contains(&report.bytes, b"word/media/"));

        let docx = docx_rs::read_docx(&report.bytes)?;
        let paragraphs: Vec<&docx_rs::Paragraph> = docx
            .document
            .children
            .iter()
            .filter_map(|child| match child {
                docx_rs::DocumentChild::Paragraph(p) => Some(p.as_ref()),
                _ => None,
            })
            .collect();
        assert_eq!(paragraphs.len(), 2);

        let styles: Vec<Option<&str>> = paragraphs
            .iter()
            .map(|p| p.property.style.as_ref().map(|s| s.val.as_str()))
            .collect();
        assert_eq!(styles.first().copied().flatten(), Some("Heading1"));
        assert_eq!(styles.iter().filter(|s| **s == Some("Heading1")).count(), 1);
        Ok(())
    }
}
