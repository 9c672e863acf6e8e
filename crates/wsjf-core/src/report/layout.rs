//! Page layout for the WSJF report.
//!
//! Renderers turn a [`ReportContent`] into positioned text runs, one
//! [`RenderedPage`] per PDF page. Coordinates are PDF points with the origin
//! at the bottom-left corner.

use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::scoring::WeightField;

/// Helvetica averages a little over half an em per glyph.
const AVG_GLYPH_WIDTH_EM: f32 = 0.55;
const LINE_SPACING: f32 = 1.5;
const TITLE_SIZE_BOOST: f32 = 7.0;
const SECTION_SIZE_BOOST: f32 = 3.0;

/// Smallest name column the table renderer accepts.
const MIN_NAME_COLUMN_CHARS: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSize {
    #[default]
    Letter,
    A4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Physical page description in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl PageGeometry {
    /// Half-inch margins.
    pub fn new(size: PageSize, orientation: Orientation) -> Self {
        let (w, h) = match size {
            PageSize::Letter => (612.0, 792.0),
            PageSize::A4 => (595.0, 842.0),
        };
        let (width, height) = match orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        };
        Self {
            width,
            height,
            margin: 36.0,
        }
    }

    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    fn top(&self) -> f32 {
        self.height - self.margin
    }

    fn bottom(&self) -> f32 {
        self.margin
    }
}

/// A single line of text placed on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub bold: bool,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedPage {
    pub runs: Vec<TextRun>,
}

/// One initiative formatted for the report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub rank: usize,
    pub name: String,
    pub scores: [String; 4],
    pub job_size: String,
    pub cod: String,
    pub wsjf: String,
}

/// Everything a renderer needs, already formatted as text.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportContent {
    pub title: String,
    pub generated_at: String,
    pub weights: Vec<(String, String)>,
    pub rows: Vec<ReportRow>,
}

/// Turns report content into pages.
pub trait ReportRenderer {
    fn name(&self) -> &'static str;

    fn render(
        &self,
        content: &ReportContent,
        geometry: &PageGeometry,
    ) -> Result<Vec<RenderedPage>, ExportError>;
}

/// Estimated rendered width of `chars` glyphs at `size`.
fn text_width(chars: usize, size: f32) -> f32 {
    chars as f32 * size * AVG_GLYPH_WIDTH_EM
}

/// How many glyphs fit in `width` at `size`.
fn chars_fitting(width: f32, size: f32) -> usize {
    (width / (size * AVG_GLYPH_WIDTH_EM)).floor().max(0.0) as usize
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars <= 3 {
        return text.chars().take(max_chars).collect();
    }
    let mut out: String = text.chars().take(max_chars - 3).collect();
    out.push_str("...");
    out
}

/// Split `text` into chunks of at most `max_chars`, preferring spaces.
fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split(' ') {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed <= max_chars {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        let mut chars: Vec<char> = word.chars().collect();
        while chars.len() > max_chars {
            let rest = chars.split_off(max_chars);
            lines.push(chars.into_iter().collect());
            chars = rest;
        }
        current = chars.into_iter().collect();
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Places lines top-down and opens new pages when the bottom margin is hit.
struct PageWriter<'a> {
    geometry: &'a PageGeometry,
    pages: Vec<RenderedPage>,
    current: RenderedPage,
    cursor: f32,
}

impl<'a> PageWriter<'a> {
    fn new(geometry: &'a PageGeometry) -> Self {
        Self {
            geometry,
            pages: Vec::new(),
            current: RenderedPage::default(),
            cursor: geometry.top(),
        }
    }

    fn fits(&self, size: f32) -> bool {
        self.cursor - size * LINE_SPACING >= self.geometry.bottom()
    }

    fn new_page(&mut self) {
        let page = std::mem::take(&mut self.current);
        self.pages.push(page);
        self.cursor = self.geometry.top();
    }

    /// A single run on its own baseline, breaking the page first if needed.
    fn line(&mut self, x: f32, size: f32, bold: bool, text: impl Into<String>) {
        if !self.fits(size) && !self.current.runs.is_empty() {
            self.new_page();
        }
        self.cursor -= size * LINE_SPACING;
        self.current.runs.push(TextRun {
            x: self.geometry.margin + x,
            y: self.cursor,
            size,
            bold,
            text: text.into(),
        });
    }

    /// Several runs sharing one baseline.
    fn row(&mut self, size: f32, bold: bool, cells: Vec<(f32, String)>) {
        self.cursor -= size * LINE_SPACING;
        for (x, text) in cells {
            self.current.runs.push(TextRun {
                x: self.geometry.margin + x,
                y: self.cursor,
                size,
                bold,
                text,
            });
        }
    }

    fn gap(&mut self, size: f32) {
        self.cursor -= size * LINE_SPACING / 2.0;
    }

    fn finish(mut self) -> Vec<RenderedPage> {
        if !self.current.runs.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }
        self.pages
    }
}

/// Title, timestamp and configured weights, shared by every layout.
fn write_header(writer: &mut PageWriter<'_>, content: &ReportContent, font_size: f32) {
    let width = writer.geometry.content_width();
    let title_size = font_size + TITLE_SIZE_BOOST;
    for line in wrap(&content.title, chars_fitting(width, title_size)) {
        writer.line(0.0, title_size, true, line);
    }
    writer.line(0.0, font_size, false, format!("Generated: {}", content.generated_at));
    writer.gap(font_size);

    writer.line(0.0, font_size + SECTION_SIZE_BOOST, true, "Configured Weights:");
    let max = chars_fitting(width, font_size);
    for (label, value) in &content.weights {
        writer.line(0.0, font_size, false, truncate(&format!("{label} Weight: {value}"), max));
    }
    writer.gap(font_size);
}

/// Fixed-width numeric columns with a flexible name column.
pub struct TableRenderer {
    pub font_size: f32,
}

struct Column {
    header: &'static str,
    chars: usize,
}

const NUMERIC_COLUMNS: [Column; 7] = [
    Column { header: "UV/TRI", chars: 7 },
    Column { header: "TC/ED", chars: 7 },
    Column { header: "RR/OE", chars: 7 },
    Column { header: "CR/SLA", chars: 7 },
    Column { header: "Job (SP)", chars: 9 },
    Column { header: "CoD", chars: 9 },
    Column { header: "WSJF", chars: 9 },
];
const RANK_COLUMN_CHARS: usize = 5;

impl TableRenderer {
    /// Column x offsets: rank, name, then the numeric columns.
    fn column_offsets(&self, geometry: &PageGeometry) -> Result<(Vec<f32>, usize), ExportError> {
        let size = self.font_size;
        let fixed_chars = RANK_COLUMN_CHARS + NUMERIC_COLUMNS.iter().map(|c| c.chars).sum::<usize>();
        let remaining = geometry.content_width() - text_width(fixed_chars, size);
        let name_chars = chars_fitting(remaining, size);
        if name_chars < MIN_NAME_COLUMN_CHARS {
            return Err(ExportError::LayoutUnavailable {
                layout: self.name(),
                reason: format!(
                    "{} columns at {size}pt need more than the {:.0}pt page width",
                    NUMERIC_COLUMNS.len() + 2,
                    geometry.content_width()
                ),
            });
        }

        let mut offsets = vec![0.0, text_width(RANK_COLUMN_CHARS, size)];
        let mut x = offsets[1] + text_width(name_chars, size);
        for column in &NUMERIC_COLUMNS {
            offsets.push(x);
            x += text_width(column.chars, size);
        }
        Ok((offsets, name_chars))
    }

    fn header_cells(offsets: &[f32]) -> Vec<(f32, String)> {
        let mut headers = vec!["Rank", "Initiative"];
        headers.extend(NUMERIC_COLUMNS.iter().map(|c| c.header));
        offsets
            .iter()
            .zip(headers)
            .map(|(x, h)| (*x, h.to_string()))
            .collect()
    }
}

impl ReportRenderer for TableRenderer {
    fn name(&self) -> &'static str {
        "table"
    }

    fn render(
        &self,
        content: &ReportContent,
        geometry: &PageGeometry,
    ) -> Result<Vec<RenderedPage>, ExportError> {
        let (offsets, name_chars) = self.column_offsets(geometry)?;
        let size = self.font_size;
        let mut writer = PageWriter::new(geometry);
        write_header(&mut writer, content, size);

        // Header plus at least one row must fit, otherwise start on a fresh page.
        if !writer.fits(size * 2.0) {
            writer.new_page();
        }
        writer.row(size, true, Self::header_cells(&offsets));

        for row in &content.rows {
            if !writer.fits(size) {
                writer.new_page();
                writer.row(size, true, Self::header_cells(&offsets));
            }
            let mut values = vec![row.rank.to_string(), truncate(&row.name, name_chars)];
            values.extend(row.scores.iter().cloned());
            values.push(row.job_size.clone());
            values.push(row.cod.clone());
            values.push(row.wsjf.clone());
            let cells = offsets.iter().copied().zip(values).collect();
            writer.row(size, false, cells);
        }
        Ok(writer.finish())
    }
}

/// One wrapped line per initiative. Always available.
pub struct PlainTextRenderer {
    pub font_size: f32,
}

impl ReportRenderer for PlainTextRenderer {
    fn name(&self) -> &'static str {
        "plain"
    }

    fn render(
        &self,
        content: &ReportContent,
        geometry: &PageGeometry,
    ) -> Result<Vec<RenderedPage>, ExportError> {
        let size = self.font_size;
        let max = chars_fitting(geometry.content_width(), size).max(MIN_NAME_COLUMN_CHARS);
        let mut writer = PageWriter::new(geometry);
        write_header(&mut writer, content, size);
        writer.line(0.0, size + SECTION_SIZE_BOOST, true, "Prioritized Initiatives:");

        for row in &content.rows {
            let scores = WeightField::ALL
                .iter()
                .zip(&row.scores)
                .map(|(field, score)| format!("{} {score}", field.code()))
                .collect::<Vec<_>>()
                .join(", ");
            let text = format!(
                "{}. {} | {scores}, Job Size {} | CoD {} | WSJF {}",
                row.rank, row.name, row.job_size, row.cod, row.wsjf
            );
            for (i, line) in wrap(&text, max).into_iter().enumerate() {
                let indent = if i == 0 { 0.0 } else { text_width(4, size) };
                writer.line(indent, size, false, line);
            }
        }
        Ok(writer.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(rows: usize) -> ReportContent {
        ReportContent {
            title: "Weighted Shortest Job First (WSJF) Prioritization Report".into(),
            generated_at: "2026-10-18 09:30".into(),
            weights: WeightField::ALL
                .iter()
                .map(|f| (format!("{} ({})", f.label(), f.code()), "2".to_string()))
                .collect(),
            rows: (1..=rows)
                .map(|rank| ReportRow {
                    rank,
                    name: format!("Initiative {rank}"),
                    scores: ["5".into(), "5".into(), "5".into(), "5".into()],
                    job_size: "5".into(),
                    cod: "40.00".into(),
                    wsjf: "8.00".into(),
                })
                .collect(),
        }
    }

    fn texts(pages: &[RenderedPage]) -> Vec<&str> {
        pages
            .iter()
            .flat_map(|p| p.runs.iter().map(|r| r.text.as_str()))
            .collect()
    }

    #[test]
    fn table_renders_all_rows_on_letter() {
        let geometry = PageGeometry::new(PageSize::Letter, Orientation::Portrait);
        let pages = TableRenderer { font_size: 9.0 }.render(&content(3), &geometry).unwrap();
        assert_eq!(pages.len(), 1);
        let all = texts(&pages);
        assert!(all.contains(&"Initiative 3"));
        assert!(all.contains(&"WSJF"));
        assert!(all.contains(&"8.00"));
        assert!(all.iter().any(|t| t.starts_with("Generated: ")));
    }

    #[test]
    fn table_paginates_and_repeats_header() {
        let geometry = PageGeometry::new(PageSize::Letter, Orientation::Portrait);
        let pages = TableRenderer { font_size: 9.0 }.render(&content(120), &geometry).unwrap();
        assert!(pages.len() > 1);
        for page in &pages {
            assert!(page.runs.iter().any(|r| r.text == "Rank" && r.bold));
            assert!(page.runs.iter().all(|r| r.y >= geometry.margin));
        }
        assert!(texts(&pages).contains(&"Initiative 120"));
    }

    #[test]
    fn table_unavailable_when_columns_do_not_fit() {
        let geometry = PageGeometry::new(PageSize::A4, Orientation::Portrait);
        let err = TableRenderer { font_size: 16.0 }.render(&content(1), &geometry).unwrap_err();
        assert!(matches!(err, ExportError::LayoutUnavailable { layout: "table", .. }));
    }

    #[test]
    fn plain_text_always_renders() {
        let geometry = PageGeometry::new(PageSize::A4, Orientation::Portrait);
        let pages = PlainTextRenderer { font_size: 16.0 }.render(&content(2), &geometry).unwrap();
        let all = texts(&pages).join("\n");
        assert!(all.contains("1. Initiative 1"));
        assert!(all.contains("WSJF 8.00"));
    }

    #[test]
    fn long_names_are_truncated_in_table() {
        let geometry = PageGeometry::new(PageSize::Letter, Orientation::Portrait);
        let mut c = content(1);
        c.rows[0].name = "x".repeat(300);
        let pages = TableRenderer { font_size: 9.0 }.render(&c, &geometry).unwrap();
        assert!(texts(&pages).iter().any(|t| t.ends_with("...")));
    }

    #[test]
    fn header_breaks_across_short_pages() {
        let geometry = PageGeometry {
            width: 612.0,
            height: 140.0,
            margin: 36.0,
        };
        let pages = PlainTextRenderer { font_size: 9.0 }.render(&content(2), &geometry).unwrap();
        assert!(pages.len() > 1);
        for page in &pages {
            assert!(!page.runs.is_empty());
            assert!(page.runs.iter().all(|r| r.y >= geometry.margin));
        }
        let all = texts(&pages).join("\n");
        assert!(all.contains("Configured Weights:"));
        assert!(all.contains("2. Initiative 2"));
    }

    #[test]
    fn wrap_splits_long_words() {
        assert_eq!(wrap("abcdefgh", 3), vec!["abc", "def", "gh"]);
        assert_eq!(wrap("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap("", 5), vec![""]);
    }

    #[test]
    fn landscape_swaps_dimensions() {
        let g = PageGeometry::new(PageSize::Letter, Orientation::Landscape);
        assert_eq!((g.width, g.height), (792.0, 612.0));
    }
}
