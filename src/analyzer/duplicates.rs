//! Chapters backed by more than one file.

use crate::types::{Chapter, Finding};

/// Flags every chapter with more than one backing file.
///
/// Chapters with zero files are not duplicates; the naming check reports them.
pub fn find_duplicate_files(chapters: &[Chapter]) -> Vec<Finding> {
    chapters
        .iter()
        .filter(|chapter| chapter.files.len() > 1)
        .map(|chapter| Finding::DuplicateFiles {
            chapter: chapter.number,
            paths: chapter
                .files
                .iter()
                .map(|file| file.file_path.clone())
                .collect(),
        })
        .collect()
}
