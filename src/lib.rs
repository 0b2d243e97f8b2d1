//! Renzoku - Continuity Auditing for Comic/Manga Libraries
//!
//! This crate audits the chapter structure of a Kavita library and reports
//! continuity problems per series: gaps in chapter numbering, chapters backed by
//! several files, file names that do not follow the `Vol. N Ch. M` convention,
//! and later volumes reusing Volume 1's chapter numbers in continuously
//! numbered series.
//!
//! # Getting Started
//!
//! Configure the audit with [`RenzokuConfig::builder`], connect to a server (or
//! load a snapshot), and stream the results into a [`report::ReportSink`].
//!
//! ```rust,no_run
//! use renzoku::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> renzoku::error::Result<()> {
//!     // 1. Configure the audit
//!     let config = RenzokuConfig::builder()
//!         .max_concurrent_fetches(4usize)
//!         .check_file_names(true)
//!         .build()?;
//!
//!     // 2. Connect with the OPDS URL shown in the Kavita user settings
//!     let client = config.connect("http://localhost:5000/api/opds/my-api-key")?;
//!     client.authenticate().await?;
//!
//!     // 3. Audit library 1, printing every series that needs attention
//!     let mut sink = TextSink::new(std::io::stdout());
//!     config.audit_library(&client, 1, &mut sink).await?;
//!     Ok(())
//! }
//! ```
//!
//! The analysis engine can also be used on its own with already-fetched data,
//! see [`analyzer::Analyzer`].

pub mod analyzer;
pub mod error;
pub mod number;
pub mod opds;
pub mod renzoku;
pub mod report;
pub mod session;
pub mod source;
pub mod types;

// Publicly expose the main `RenzokuConfig` struct and its builder
pub use renzoku::RenzokuConfig;
pub use renzoku::RenzokuConfigBuilder;

// Re-export core types for direct access
pub use number::ChapterNumber;
pub use types::{
    AuditHeader, AuditSummary, Chapter, ChapterFile, Finding, FindingKind, Library,
    NumberingScheme, OutputFormat, Series, SeriesReport, Volume, VolumeReport,
};

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and traits, allowing you to
/// import everything you need with a single `use renzoku::prelude::*;` statement.
pub mod prelude {
    pub use super::{
        AuditHeader, AuditSummary, Chapter, ChapterFile, ChapterNumber, Finding, FindingKind,
        Library, NumberingScheme, OutputFormat, RenzokuConfig, RenzokuConfigBuilder, Series,
        SeriesReport, Volume, VolumeReport, error, types,
    };
    pub use crate::analyzer::Analyzer;
    pub use crate::opds::OpdsUrl;
    pub use crate::report::{JsonSink, MultiSink, ReportSink, TextSink};
    pub use crate::session::{Prompter, Session, SessionState, TerminalPrompter};
    pub use crate::source::LibrarySource;
    pub use crate::source::kavita::KavitaClient;
    pub use crate::source::snapshot::{Snapshot, SnapshotSource};
}
