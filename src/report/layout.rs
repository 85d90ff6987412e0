//! Document layout, independent of any byte encoding.
//!
//! A [`PrintLayout`] is the page sequence of the paginated format: text
//! pages first (the title page plus continuations), then one page per
//! exhibit in artifact order. A [`FlowLayout`] is the single heading and
//! paragraph of the flow format, which never carries images.

use crate::charts::VisualizationArtifact;
use std::path::PathBuf;

pub const REPORT_TITLE: &str = "Automated Data Analysis Report";

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const SIDE_MARGIN_MM: f32 = 10.0;
pub const TOP_MARGIN_MM: f32 = 10.0;
pub const BOTTOM_MARGIN_MM: f32 = 15.0;
pub const LINE_PITCH_MM: f32 = 8.0;
pub const IMAGE_WIDTH_MM: f32 = 190.0;
pub const IMAGE_TOP_MM: f32 = 25.0;

pub const TITLE_FONT_PT: f32 = 16.0;
pub const BODY_FONT_PT: f32 = 12.0;
pub const HEADING_FONT_PT: f32 = 14.0;

pub const PT_TO_MM: f32 = 25.4 / 72.0;
/// Usable line width between the side margins.
pub const TEXT_WIDTH_MM: f32 = PAGE_WIDTH_MM - 2.0 * SIDE_MARGIN_MM;

/// Helvetica advance widths for ASCII 32..=126, in 1/1000 em (Adobe AFM).
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0..?
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // P.._
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // `..o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,      // p..~
];
/// Anything outside printable ASCII is measured as a full em.
const FALLBACK_WIDTH: u16 = 1000;

fn glyph_width(c: char) -> u16 {
    (c as usize)
        .checked_sub(32)
        .and_then(|i| HELVETICA_WIDTHS.get(i))
        .copied()
        .unwrap_or(FALLBACK_WIDTH)
}

/// Rendered width of `text` in Helvetica at `font_pt`.
pub fn text_width_mm(text: &str, font_pt: f32) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(glyph_width(c))).sum();
    units as f32 / 1000.0 * font_pt * PT_TO_MM
}

/// Wraps body text so every line fits between the side margins at 12 pt.
pub fn wrap_body(text: &str) -> Vec<String> {
    wrap_text(text, TEXT_WIDTH_MM, |s| text_width_mm(s, BODY_FONT_PT))
}

/// Body lines on the title page; the title and a spacer take two slots.
pub fn first_page_lines() -> usize {
    lines_per_page().saturating_sub(2).max(1)
}

pub fn lines_per_page() -> usize {
    let usable = PAGE_HEIGHT_MM - TOP_MARGIN_MM - BOTTOM_MARGIN_MM;
    ((usable / LINE_PITCH_MM).floor() as usize).max(1)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Page {
    Text {
        /// Only the first text page carries the title.
        title: Option<String>,
        lines: Vec<String>,
    },
    Exhibit {
        heading: String,
        image: PathBuf,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrintLayout {
    pub pages: Vec<Page>,
}

impl PrintLayout {
    pub fn build(text: &str, artifacts: &[VisualizationArtifact]) -> Self {
        let lines = wrap_body(text);

        let mut pages = Vec::new();
        let (head, mut rest) = lines.split_at(first_page_lines().min(lines.len()));
        pages.push(Page::Text {
            title: Some(REPORT_TITLE.to_owned()),
            lines: head.to_vec(),
        });
        while !rest.is_empty() {
            let (chunk, tail) = rest.split_at(lines_per_page().min(rest.len()));
            pages.push(Page::Text {
                title: None,
                lines: chunk.to_vec(),
            });
            rest = tail;
        }

        pages.extend(artifacts.iter().map(|artifact| Page::Exhibit {
            heading: artifact.file_name(),
            image: artifact.path.clone(),
        }));

        Self { pages }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn text_pages(&self) -> usize {
        self.pages
            .iter()
            .filter(|p| matches!(p, Page::Text { .. }))
            .count()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlowLayout {
    pub heading: String,
    /// Lines of the single paragraph block, split on the source line breaks.
    pub paragraph: Vec<String>,
}

impl FlowLayout {
    pub fn build(text: &str) -> Self {
        Self {
            heading: REPORT_TITLE.to_owned(),
            paragraph: text.lines().map(str::to_owned).collect(),
        }
    }
}

/// Greedy word wrap on each source line, keeping every line within
/// `max_width` as reported by `measure`. Blank source lines are kept,
/// leading indentation is repeated on continuation lines and words wider
/// than the line are split.
pub fn wrap_text<F>(text: &str, max_width: f32, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f32,
{
    let mut out = Vec::new();

    for source in text.lines() {
        if source.trim().is_empty() {
            out.push(String::new());
            continue;
        }

        let mut indent: String = source.chars().take_while(|c| c.is_whitespace()).collect();
        if measure(&indent) * 2.0 > max_width {
            indent.clear();
        }
        let room = max_width - measure(&indent);
        let has_words = |line: &String| line.len() > indent.len();
        let mut line = indent.clone();

        for mut word in source.split_whitespace() {
            while measure(word) > room {
                if has_words(&line) {
                    out.push(std::mem::replace(&mut line, indent.clone()));
                }
                let split = fitting_prefix(word, room, &measure);
                out.push(format!("{indent}{}", &word[..split]));
                word = &word[split..];
            }
            if word.is_empty() {
                continue;
            }

            if has_words(&line) && measure(&format!("{line} {word}")) > max_width {
                out.push(std::mem::replace(&mut line, indent.clone()));
            }
            if has_words(&line) {
                line.push(' ');
            }
            line.push_str(word);
        }
        if has_words(&line) {
            out.push(line);
        }
    }
    out
}

/// Byte length of the longest prefix of `word` within `max_width`, never
/// less than one character.
fn fitting_prefix<F>(word: &str, max_width: f32, measure: &F) -> usize
where
    F: Fn(&str) -> f32,
{
    let mut fit = word.chars().next().map_or(0, char::len_utf8);
    for (i, c) in word.char_indices().skip(1) {
        let end = i + c.len_utf8();
        if measure(&word[..end]) > max_width {
            break;
        }
        fit = end;
    }
    fit
}
