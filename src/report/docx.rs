//! Flow-document output. Text only; exhibits are not embedded.

use super::layout::FlowLayout;
use crate::error::{ReportError, Result};
use docx_rs::{BreakType, Docx, Paragraph, Run, Style, StyleType};
use std::io::Cursor;

const HEADING_STYLE: &str = "Heading1";

pub fn write_docx(layout: &FlowLayout) -> Result<Vec<u8>> {
    let mut run = Run::new();
    for (i, line) in layout.paragraph.iter().enumerate() {
        if i > 0 {
            run = run.add_break(BreakType::TextWrapping);
        }
        run = run.add_text(line.as_str());
    }

    let docx = Docx::new()
        .add_style(
            Style::new(HEADING_STYLE, StyleType::Paragraph)
                .name("Heading 1")
                .size(32)
                .bold(),
        )
        .add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(layout.heading.as_str()))
                .style(HEADING_STYLE),
        )
        .add_paragraph(Paragraph::new().add_run(run));

    let mut buffer = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buffer)
        .map_err(|e| ReportError::Assembly(format!("failed to pack document: {e}")))?;
    Ok(buffer.into_inner())
}
