//! PDF report export.
//!
//! The exporter consumes a [`ReportSnapshot`] (the ordered initiatives and
//! the weights, copied when the export was requested) and produces a
//! paginated PDF. The table layout is preferred; when it cannot be used the
//! exporter falls back to the plain-text layout.

mod layout;
mod pdf;

pub use layout::{
    Orientation, PageGeometry, PageSize, PlainTextRenderer, RenderedPage, ReportContent,
    ReportRenderer, ReportRow, TableRenderer, TextRun,
};

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::ReportConfig;
use crate::error::ExportError;
use crate::initiative::Initiative;
use crate::scoring::WeightSet;

/// Which renderer to try first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportLayout {
    #[default]
    Table,
    #[serde(rename = "plain", alias = "plain_text")]
    PlainText,
}

impl std::fmt::Display for ReportLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportLayout::Table => f.write_str("table"),
            ReportLayout::PlainText => f.write_str("plain"),
        }
    }
}

impl std::str::FromStr for ReportLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(ReportLayout::Table),
            "plain" | "plain_text" | "text" => Ok(ReportLayout::PlainText),
            other => Err(format!("unknown layout '{other}' (expected table or plain)")),
        }
    }
}

/// Read-only copy of the backlog at the moment an export was requested.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSnapshot {
    initiatives: Vec<Initiative>,
    weights: WeightSet,
    taken_at: DateTime<Utc>,
}

impl ReportSnapshot {
    pub fn new(initiatives: Vec<Initiative>, weights: WeightSet) -> Self {
        Self {
            initiatives,
            weights,
            taken_at: Utc::now(),
        }
    }

    pub fn initiatives(&self) -> &[Initiative] {
        &self.initiatives
    }

    pub fn weights(&self) -> &WeightSet {
        &self.weights
    }

    pub fn taken_at(&self) -> DateTime<Utc> {
        self.taken_at
    }

    /// Format the snapshot for the renderers.
    pub fn content(&self, title: &str) -> ReportContent {
        let weights = self
            .weights
            .components()
            .iter()
            .map(|(field, value)| (format!("{} ({})", field.label(), field.code()), value.to_string()))
            .collect();
        let rows = self
            .initiatives
            .iter()
            .enumerate()
            .map(|(index, initiative)| {
                let scores = initiative.scores().components().map(|(_, score)| score.to_string());
                ReportRow {
                    rank: index + 1,
                    name: initiative.name().to_string(),
                    scores,
                    job_size: initiative.job_size().to_string(),
                    cod: format!("{:.2}", initiative.cod()),
                    wsjf: format!("{:.2}", initiative.wsjf()),
                }
            })
            .collect();

        ReportContent {
            title: title.to_string(),
            generated_at: self
                .taken_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S %:z")
                .to_string(),
            weights,
            rows,
        }
    }
}

/// A rendered report held in memory.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub bytes: Vec<u8>,
    pub layout: ReportLayout,
    pub pages: usize,
    pub initiatives: usize,
}

/// Result of a successful export to disk.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportOutcome {
    pub path: PathBuf,
    pub layout: ReportLayout,
    pub pages: usize,
    pub initiatives: usize,
    pub bytes: usize,
}

/// Options the exporter renders with.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    pub title: String,
    pub layout: ReportLayout,
    pub page_size: PageSize,
    pub orientation: Orientation,
    pub font_size: f32,
    pub file_prefix: String,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions::from(&ReportConfig::default())
    }
}

impl From<&ReportConfig> for ReportOptions {
    fn from(config: &ReportConfig) -> Self {
        Self {
            title: config.title.clone(),
            layout: config.layout,
            page_size: config.page_size,
            orientation: config.orientation,
            font_size: config.font_size,
            file_prefix: config.file_prefix.clone(),
        }
    }
}

/// Clears the exporter's in-progress flag when dropped.
struct ExportGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for ExportGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Renders snapshots to PDF. Rejects a new export while one is running.
#[derive(Debug, Default)]
pub struct ReportExporter {
    options: ReportOptions,
    in_progress: AtomicBool,
}

impl ReportExporter {
    pub fn new(options: ReportOptions) -> Self {
        Self {
            options,
            in_progress: AtomicBool::new(false),
        }
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    pub fn is_exporting(&self) -> bool {
        self.in_progress.load(Ordering::Acquire)
    }

    fn begin(&self) -> Result<ExportGuard<'_>, ExportError> {
        self.in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ExportError::InProgress)?;
        Ok(ExportGuard {
            flag: &self.in_progress,
        })
    }

    /// `<prefix>_<YYYY-MM-DD>.pdf`
    pub fn file_name_for(&self, date: NaiveDate) -> String {
        format!("{}_{}.pdf", self.options.file_prefix, date.format("%Y-%m-%d"))
    }

    /// File name for today's local date.
    pub fn default_file_name(&self) -> String {
        self.file_name_for(Local::now().date_naive())
    }

    /// Render `snapshot` to PDF bytes.
    pub fn render(&self, snapshot: &ReportSnapshot) -> Result<RenderedReport, ExportError> {
        let _guard = self.begin()?;
        self.render_unguarded(snapshot)
    }

    fn render_unguarded(&self, snapshot: &ReportSnapshot) -> Result<RenderedReport, ExportError> {
        if snapshot.initiatives().is_empty() {
            return Err(ExportError::EmptyCollection);
        }
        let font_size = self.options.font_size;
        if !(font_size.is_finite() && font_size > 0.0) {
            return Err(ExportError::InvalidFontSize(font_size));
        }

        let geometry = PageGeometry::new(self.options.page_size, self.options.orientation);
        let content = snapshot.content(&self.options.title);
        let (pages, layout) = self.paginate(&content, &geometry)?;
        let bytes = pdf::encode(&pages, &geometry, &self.options.title)?;

        Ok(RenderedReport {
            bytes,
            layout,
            pages: pages.len(),
            initiatives: snapshot.initiatives().len(),
        })
    }

    fn paginate(
        &self,
        content: &ReportContent,
        geometry: &PageGeometry,
    ) -> Result<(Vec<RenderedPage>, ReportLayout), ExportError> {
        let font_size = self.options.font_size;
        let plain = PlainTextRenderer { font_size };
        if self.options.layout == ReportLayout::Table {
            match (TableRenderer { font_size }).render(content, geometry) {
                Ok(pages) => return Ok((pages, ReportLayout::Table)),
                Err(ExportError::LayoutUnavailable { layout, reason }) => {
                    warn!(layout, %reason, "falling back to plain-text report layout");
                }
                Err(e) => return Err(e),
            }
        }
        Ok((plain.render(content, geometry)?, ReportLayout::PlainText))
    }

    /// Render `snapshot` and write it to `path`.
    ///
    /// Nothing is written when rendering fails.
    pub fn export_to(
        &self,
        snapshot: &ReportSnapshot,
        path: &Path,
    ) -> Result<ExportOutcome, ExportError> {
        let _guard = self.begin()?;
        let report = self.render_unguarded(snapshot)?;
        std::fs::write(path, &report.bytes).map_err(|source| ExportError::Destination {
            path: path.to_path_buf(),
            source,
        })?;

        info!(
            path = %path.display(),
            layout = %report.layout,
            pages = report.pages,
            initiatives = report.initiatives,
            "report exported"
        );
        Ok(ExportOutcome {
            path: path.to_path_buf(),
            layout: report.layout,
            pages: report.pages,
            initiatives: report.initiatives,
            bytes: report.bytes.len(),
        })
    }
}
