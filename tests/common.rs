//! Common test utilities for the Renzoku crate.
//!
//! Provides builders for series/volume/chapter fixtures, a sink that records
//! everything it receives, and a prompter that replays scripted answers.

use std::collections::VecDeque;

use renzoku::error::{Error, Result};
use renzoku::prelude::*;
use renzoku::session::Prompter;

/// A chapter with one file per entry in `files`.
#[allow(dead_code)]
pub fn chapter(number: &str, files: &[&str]) -> Chapter {
    Chapter {
        number: number.parse().expect("valid chapter number"),
        files: files
            .iter()
            .map(|path| ChapterFile {
                file_path: path.to_string(),
                pages: 20,
            })
            .collect(),
        is_special: false,
    }
}

/// A chapter whose single file follows the `Vol. N Ch. M` convention.
#[allow(dead_code)]
pub fn named_chapter(volume: i32, number: &str) -> Chapter {
    let path = format!("/manga/Series/Series Vol. {} Ch. {}.cbz", volume, number);
    chapter(number, &[&path])
}

#[allow(dead_code)]
pub fn special(number: &str, files: &[&str]) -> Chapter {
    Chapter {
        is_special: true,
        ..chapter(number, files)
    }
}

#[allow(dead_code)]
pub fn volume(number: i32, chapters: Vec<Chapter>) -> Volume {
    Volume { number, chapters }
}

/// A volume whose chapters are all correctly named.
#[allow(dead_code)]
pub fn named_volume(number: i32, chapter_numbers: &[&str]) -> Volume {
    volume(
        number,
        chapter_numbers
            .iter()
            .map(|n| named_chapter(number, n))
            .collect(),
    )
}

#[allow(dead_code)]
pub fn series(id: i64, name: &str) -> Series {
    Series {
        id,
        name: name.to_string(),
    }
}

/// Sink that keeps everything it receives.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub headers: Vec<AuditHeader>,
    pub reports: Vec<SeriesReport>,
    pub summaries: Vec<AuditSummary>,
}

impl ReportSink for RecordingSink {
    fn begin(&mut self, header: &AuditHeader) -> Result<()> {
        self.headers.push(header.clone());
        Ok(())
    }

    fn emit(&mut self, report: &SeriesReport) -> Result<()> {
        self.reports.push(report.clone());
        Ok(())
    }

    fn finish(&mut self, summary: &AuditSummary) -> Result<()> {
        self.summaries.push(summary.clone());
        Ok(())
    }
}

/// Prompter replaying canned answers; fails once the script runs out.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    pub library_ids: VecDeque<String>,
    pub answers: VecDeque<bool>,
    pub messages: Vec<String>,
}

#[allow(dead_code)]
impl ScriptedPrompter {
    pub fn new(library_ids: &[&str], answers: &[bool]) -> Self {
        Self {
            library_ids: library_ids.iter().map(|s| s.to_string()).collect(),
            answers: answers.iter().copied().collect(),
            messages: Vec::new(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn library_id(&mut self) -> Result<String> {
        self.library_ids
            .pop_front()
            .ok_or_else(|| Error::Other("script has no more library ids".to_string()))
    }

    fn check_another(&mut self) -> Result<bool> {
        self.answers
            .pop_front()
            .ok_or_else(|| Error::Other("script has no more answers".to_string()))
    }

    fn notify(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}

/// Snapshot with one library (id 1) holding a clean series and a broken one.
///
/// "Clean Series" (id 10) is volume-relative and fully named. "Broken Series"
/// (id 20) numbers continuously, misses chapters 3 and 5-6 in volume 2, reuses
/// chapter 2 from volume 1, and has a badly named chapter 7.
#[allow(dead_code)]
pub const LIBRARY_SNAPSHOT: &str = r#"{
  "libraries": [
    {
      "id": 1,
      "name": "Manga",
      "series": [
        {
          "id": 10,
          "name": "Clean Series",
          "volumes": [
            { "number": 1, "chapters": [
              { "number": "1", "isSpecial": false, "files": [ { "filePath": "/manga/Clean/Clean Vol. 1 Ch. 001.cbz", "pages": 18 } ] },
              { "number": "2", "isSpecial": false, "files": [ { "filePath": "/manga/Clean/Clean Vol. 1 Ch. 002.cbz", "pages": 18 } ] }
            ] },
            { "number": 2, "chapters": [
              { "number": "1", "isSpecial": false, "files": [ { "filePath": "/manga/Clean/Clean Vol. 2 Ch. 001.cbz", "pages": 18 } ] }
            ] }
          ]
        },
        {
          "id": 20,
          "name": "Broken Series",
          "volumes": [
            { "number": 2, "chapters": [
              { "number": "7", "isSpecial": false, "files": [ { "filePath": "/manga/Broken/bad.cbz", "pages": 18 } ] },
              { "number": 2, "isSpecial": false, "files": [ { "filePath": "/manga/Broken/Broken Vol. 2 Ch. 2.cbz", "pages": 18 } ] },
              { "number": "4", "isSpecial": false, "files": [ { "filePath": "/manga/Broken/Broken Vol. 2 Ch. 04.cbz", "pages": 18 } ] }
            ] },
            { "number": 1, "chapters": [
              { "number": "1", "isSpecial": false, "files": [ { "filePath": "/manga/Broken/Broken Vol. 1 Ch. 1.cbz", "pages": 18 } ] },
              { "number": "2", "isSpecial": false, "files": [ { "filePath": "/manga/Broken/Broken Vol. 1 Ch. 2.cbz", "pages": 18 } ] },
              { "number": "3", "isSpecial": false, "files": [ { "filePath": "/manga/Broken/Broken Vol. 1 Ch. 3.cbz", "pages": 18 } ] }
            ] }
          ]
        }
      ]
    }
  ]
}"#;

/// Text report expected for "Broken Series" from [`LIBRARY_SNAPSHOT`].
#[allow(dead_code)]
pub const BROKEN_SERIES_REPORT: &str = "Series: Broken Series\n\
Volume 2 has overlapping chapter numbers with Volume 1.\n\
Volume: 2\n\
Missing Chapters: 3-3, 5-6\n\
File Name Mismatches: File name mismatch for chapter 7: bad.cbz does not match expected format for Volume 2 Chapter 7\n";
