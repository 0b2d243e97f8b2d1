//! Report rendering and sinks.
//!
//! The analysis engine returns structured [`SeriesReport`]s; this module turns them
//! into text or JSON Lines and writes them out. Sinks receive exactly one
//! [`begin`](ReportSink::begin), one [`emit`](ReportSink::emit) per series that has
//! findings, and one [`finish`](ReportSink::finish) per audited library.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::types::{AuditHeader, AuditSummary, FindingKind, SeriesReport, VolumeReport};

/// Header written at the top of every text report.
pub const RUN_HEADER: &str = "Missing Chapters: \n\n--------------------------\n";

/// Common interface for report destinations.
pub trait ReportSink {
    /// Called once before any series of a library is reported.
    fn begin(&mut self, header: &AuditHeader) -> Result<()>;

    /// Called once per series with at least one finding, in series order.
    fn emit(&mut self, report: &SeriesReport) -> Result<()>;

    /// Called once when the library run ends, including runs that stop on an error.
    fn finish(&mut self, summary: &AuditSummary) -> Result<()>;
}

/// Renders one volume section: the overlap line (if any), then the volume header
/// and one line per non-empty finding category.
pub fn render_volume(volume: &VolumeReport) -> String {
    let mut out = String::new();
    if let Some(overlap) = &volume.overlap {
        out.push_str(&format!("{}\n", overlap));
    }
    if volume.findings.is_empty() {
        return out;
    }

    out.push_str(&format!("Volume: {}\n", volume.number));
    for kind in FindingKind::VOLUME_SECTION_ORDER {
        let lines: Vec<String> = volume.of_kind(kind).map(ToString::to_string).collect();
        if !lines.is_empty() {
            out.push_str(&format!("{}: {}\n", kind.label(), lines.join(kind.separator())));
        }
    }
    out
}

/// Renders a full series report as plain text.
///
/// ```text
/// Series: Some Series
/// Volume 3 has overlapping chapter numbers with Volume 1.
/// Volume: 3
/// Missing Chapters: 21-22
/// ```
pub fn render_series(report: &SeriesReport) -> String {
    let mut out = format!("Series: {}\n", report.series.name);
    for volume in &report.volumes {
        out.push_str(&render_volume(volume));
    }
    out
}

/// Renders the closing line of a library run.
pub fn render_summary(summary: &AuditSummary) -> String {
    format!(
        "Checked {} series in library {}: {} with issues, {} findings.\n",
        summary.series_checked, summary.library_id, summary.series_with_issues, summary.findings
    )
}

/// Writes plain-text reports, one blank line after each block.
#[derive(Debug)]
pub struct TextSink<W: Write> {
    writer: W,
}

impl TextSink<BufWriter<File>> {
    /// Creates (or truncates) a log file at `path`.
    pub fn create(path: &Path) -> Result<Self> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> TextSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_block(&mut self, block: &str) -> Result<()> {
        writeln!(self.writer, "{}", block)?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> ReportSink for TextSink<W> {
    fn begin(&mut self, _header: &AuditHeader) -> Result<()> {
        self.write_block(RUN_HEADER)
    }

    fn emit(&mut self, report: &SeriesReport) -> Result<()> {
        self.write_block(&render_series(report))
    }

    fn finish(&mut self, summary: &AuditSummary) -> Result<()> {
        self.write_block(&render_summary(summary))
    }
}

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum JsonEvent<'a> {
    Begin(&'a AuditHeader),
    Series(&'a SeriesReport),
    Finish(&'a AuditSummary),
}

/// Writes one JSON object per line: `begin`, `series` events, then `finish`.
#[derive(Debug)]
pub struct JsonSink<W: Write> {
    writer: W,
}

impl JsonSink<BufWriter<File>> {
    /// Creates (or truncates) a JSON Lines file at `path`.
    pub fn create(path: &Path) -> Result<Self> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_event(&mut self, event: JsonEvent<'_>) -> Result<()> {
        serde_json::to_writer(&mut self.writer, &event)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> ReportSink for JsonSink<W> {
    fn begin(&mut self, header: &AuditHeader) -> Result<()> {
        self.write_event(JsonEvent::Begin(header))
    }

    fn emit(&mut self, report: &SeriesReport) -> Result<()> {
        self.write_event(JsonEvent::Series(report))
    }

    fn finish(&mut self, summary: &AuditSummary) -> Result<()> {
        self.write_event(JsonEvent::Finish(summary))
    }
}

/// Forwards every call to each inner sink, in insertion order.
#[derive(Default)]
pub struct MultiSink {
    sinks: Vec<Box<dyn ReportSink>>,
}

impl MultiSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: impl ReportSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl ReportSink for MultiSink {
    fn begin(&mut self, header: &AuditHeader) -> Result<()> {
        self.sinks.iter_mut().try_for_each(|sink| sink.begin(header))
    }

    fn emit(&mut self, report: &SeriesReport) -> Result<()> {
        self.sinks.iter_mut().try_for_each(|sink| sink.emit(report))
    }

    fn finish(&mut self, summary: &AuditSummary) -> Result<()> {
        self.sinks.iter_mut().try_for_each(|sink| sink.finish(summary))
    }
}
