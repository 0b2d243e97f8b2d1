//! Core data types, findings and reports for the Renzoku auditor.
//!
//! This module defines the fundamental data structures used throughout Renzoku:
//! - Library records as delivered by the server (`Series`, `Volume`, `Chapter`, `ChapterFile`)
//! - Analysis output (`Finding`, `VolumeReport`, `SeriesReport`)
//! - Run bookkeeping (`AuditHeader`, `AuditSummary`)
//! - Enumerations for various settings (`NumberingScheme`, `OutputFormat`)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::number::ChapterNumber;

/// A single comic/manga title in a library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub id: i64,
    pub name: String,
}

/// A numbered grouping of chapters within a series.
///
/// Kavita puts loose chapters into a volume with a sentinel number (`0` on older
/// servers, `-100000` on newer ones), so the number is signed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    pub number: i32,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

/// A numbered unit of content, decimal-numbered to allow half-chapters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub number: ChapterNumber,
    #[serde(default)]
    pub files: Vec<ChapterFile>,
    #[serde(default)]
    pub is_special: bool,
}

/// A file backing a chapter. More than one per chapter means duplicate content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterFile {
    pub file_path: String,
    #[serde(default)]
    pub pages: u32,
}

impl ChapterFile {
    /// The final path segment after `/`, which is what naming checks look at.
    pub fn base_name(&self) -> &str {
        self.file_path
            .rsplit('/')
            .next()
            .unwrap_or(self.file_path.as_str())
    }
}

/// A library on the server, as listed in snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Library {
    pub id: i64,
    pub name: String,
}

/// How a series numbers its chapters across volumes.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Serialize, Deserialize)]
pub enum NumberingScheme {
    /// Chapter numbers restart near 1 in every volume.
    #[default]
    VolumeRelative,
    /// Chapter numbers increase across the whole series.
    Continuous,
}

/// Category of a [`Finding`], used to group lines in the rendered report.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum FindingKind {
    MissingRange,
    DuplicateFiles,
    FilenameMismatch,
    VolumeOverlap,
    Unanalyzable,
}

impl FindingKind {
    /// Order in which categories appear inside a volume section.
    pub const VOLUME_SECTION_ORDER: [FindingKind; 4] = [
        FindingKind::MissingRange,
        FindingKind::DuplicateFiles,
        FindingKind::FilenameMismatch,
        FindingKind::Unanalyzable,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FindingKind::MissingRange => "Missing Chapters",
            FindingKind::DuplicateFiles => "Duplicate Chapters",
            FindingKind::FilenameMismatch => "File Name Mismatches",
            FindingKind::VolumeOverlap => "Volume Overlaps",
            FindingKind::Unanalyzable => "Unanalyzable Chapters",
        }
    }

    /// Missing ranges share one line; every other category gets one line per finding.
    pub fn separator(&self) -> &'static str {
        match self {
            FindingKind::MissingRange => ", ",
            _ => "\n",
        }
    }
}

/// One reported anomaly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    /// Whole chapter numbers missing between two neighbours (inclusive bounds).
    MissingRange { first: i64, last: i64 },
    /// A chapter backed by more than one file.
    DuplicateFiles {
        chapter: ChapterNumber,
        paths: Vec<String>,
    },
    /// The chapter's first file does not follow the naming convention of its volume.
    FilenameMismatch {
        chapter: ChapterNumber,
        file_name: String,
        volume: i32,
    },
    /// A later volume reuses chapter numbers from Volume 1 in a continuously numbered series.
    VolumeOverlap { volume: i32 },
    /// A non-special chapter without files; its name cannot be checked.
    Unanalyzable { chapter: ChapterNumber },
}

impl Finding {
    pub fn kind(&self) -> FindingKind {
        match self {
            Finding::MissingRange { .. } => FindingKind::MissingRange,
            Finding::DuplicateFiles { .. } => FindingKind::DuplicateFiles,
            Finding::FilenameMismatch { .. } => FindingKind::FilenameMismatch,
            Finding::VolumeOverlap { .. } => FindingKind::VolumeOverlap,
            Finding::Unanalyzable { .. } => FindingKind::Unanalyzable,
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::MissingRange { first, last } => write!(f, "{}-{}", first, last),
            Finding::DuplicateFiles { chapter, paths } => {
                write!(f, "Multiple files found for chapter {}: ", chapter)?;
                for path in paths {
                    write!(f, "\n - {}", path)?;
                }
                Ok(())
            }
            Finding::FilenameMismatch {
                chapter,
                file_name,
                volume,
            } => write!(
                f,
                "File name mismatch for chapter {}: {} does not match expected format for Volume {} Chapter {}",
                chapter, file_name, volume, chapter
            ),
            Finding::VolumeOverlap { volume } => write!(
                f,
                "Volume {} has overlapping chapter numbers with Volume 1.",
                volume
            ),
            Finding::Unanalyzable { chapter } => write!(
                f,
                "Chapter {} has no files attached and could not be checked",
                chapter
            ),
        }
    }
}

/// Findings for one volume. Only volumes with at least one finding are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VolumeReport {
    pub number: i32,
    /// Set when this volume reuses chapter numbers of Volume 1.
    pub overlap: Option<Finding>,
    /// Missing ranges, duplicates, mismatches and unanalyzable chapters, in that order.
    pub findings: Vec<Finding>,
}

impl VolumeReport {
    pub fn is_clean(&self) -> bool {
        self.overlap.is_none() && self.findings.is_empty()
    }

    pub fn finding_count(&self) -> usize {
        self.findings.len() + usize::from(self.overlap.is_some())
    }

    /// Findings of one category, in detection order.
    pub fn of_kind(&self, kind: FindingKind) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.kind() == kind)
    }
}

/// Report for one series; produced only when something was found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesReport {
    pub series: Series,
    pub numbering: NumberingScheme,
    pub volumes: Vec<VolumeReport>,
}

impl SeriesReport {
    pub fn finding_count(&self) -> usize {
        self.volumes.iter().map(VolumeReport::finding_count).sum()
    }

    /// All findings in report order (overlap before the volume's own findings).
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.volumes
            .iter()
            .flat_map(|v| v.overlap.iter().chain(v.findings.iter()))
    }
}

/// Written once before any series of a library run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditHeader {
    pub library_id: i64,
    pub series_count: usize,
    pub started_at: DateTime<Utc>,
}

/// Outcome of auditing one library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditSummary {
    pub library_id: i64,
    pub series_checked: usize,
    pub series_with_issues: usize,
    pub findings: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl AuditSummary {
    pub(crate) fn start(header: &AuditHeader) -> Self {
        Self {
            library_id: header.library_id,
            series_checked: 0,
            series_with_issues: 0,
            findings: 0,
            started_at: header.started_at,
            finished_at: header.started_at,
        }
    }

    pub(crate) fn record(&mut self, report: Option<&SeriesReport>) {
        self.series_checked += 1;
        if let Some(report) = report {
            self.series_with_issues += 1;
            self.findings += report.finding_count();
        }
    }
}

/// Output format for the persisted report.
#[derive(Debug, PartialEq, Clone, Copy, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
